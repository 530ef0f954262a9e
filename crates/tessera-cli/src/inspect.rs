//! Reading, decoding and rendering serialized inputs.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, bail};
use serde_json::Value;
use tessera_core::{JsonKind, JsonTree};
use tessera_inputs::{InputsAdapter, ParseConfig, SingletonInputs};

use crate::TRACING_TARGET_INSPECT;
use crate::config::{InspectConfig, OutputFormat, is_stdin};

/// View fields holding opaque payloads.
const PAYLOAD_FIELDS: [&str; 4] = [
    "multi_modal_data",
    "multi_modal_inputs",
    "multi_modal_placeholders",
    "mm_processor_kwargs",
];

/// Reads the whole input source into memory.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Decodes one input object, or an array of them, into adapters.
pub fn load_adapters(text: &str, config: &ParseConfig) -> anyhow::Result<Vec<InputsAdapter>> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;

    let adapters = match value {
        Value::Array(items) if items.is_empty() => bail!("input array is empty"),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                SingletonInputs::from_json_value(item, config)
                    .map(InputsAdapter::from)
                    .with_context(|| format!("invalid input at index {index}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        object => vec![InputsAdapter::from(
            SingletonInputs::from_json_value(object, config).context("invalid input")?,
        )],
    };

    tracing::debug!(
        target: TRACING_TARGET_INSPECT,
        count = adapters.len(),
        "Loaded inputs"
    );

    Ok(adapters)
}

/// Renders the unified view of every adapter.
///
/// `json` prints one compact document per input and line. `pretty` prints a
/// single indented document: the object itself for one input, an array
/// otherwise.
pub fn render(adapters: &[InputsAdapter], config: &InspectConfig) -> anyhow::Result<String> {
    let mut views = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        let view = adapter.view();
        tracing::debug!(
            target: TRACING_TARGET_INSPECT,
            kind = %view.kind,
            prompt_tokens = view.num_tokens(),
            placeholders = view.multi_modal_placeholders.len(),
            "Resolved input view"
        );

        let mut value = serde_json::to_value(&view).context("failed to serialize input view")?;
        if config.summarize {
            summarize_payloads(&mut value)?;
        }
        views.push(value);
    }

    let rendered = match config.format {
        OutputFormat::Json => views
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        OutputFormat::Pretty if views.len() == 1 => serde_json::to_string_pretty(&views[0])?,
        OutputFormat::Pretty => serde_json::to_string_pretty(&views)?,
    };

    Ok(rendered)
}

/// Replaces every payload leaf of a serialized view with its JSON kind.
fn summarize_payloads(view: &mut Value) -> anyhow::Result<()> {
    let Some(fields) = view.as_object_mut() else {
        bail!("input view did not serialize to an object");
    };

    for field in PAYLOAD_FIELDS {
        if let Some(payload) = fields.get_mut(field) {
            let tree = JsonTree::from(payload.take());
            *payload = serde_json::to_value(tree.map_leaves(JsonKind::of))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;
    use tessera_inputs::{InputsKind, ListCheck};

    use super::*;

    const MULTIMODAL: &str = r#"{
        "type": "multimodal",
        "prompt_token_ids": [1, 32000, 32000, 2],
        "mm_kwargs": {"pixel_values": [[0.1, 0.2], [0.3, 0.4]], "image_sizes": [[2, 2]]},
        "mm_placeholders": {"image": [{"offset": 1, "length": 2}]}
    }"#;

    #[test]
    fn test_read_source_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{MULTIMODAL}").unwrap();

        let text = read_source(file.path()).unwrap();
        let adapters = load_adapters(&text, &ParseConfig::default()).unwrap();

        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].kind(), InputsKind::Multimodal);
    }

    #[test]
    fn test_read_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = read_source(&dir.path().join("absent.json")).unwrap_err();
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn test_load_array_of_inputs() {
        let text = json!([
            {"type": "token", "prompt_token_ids": [1, 2]},
            {"type": "multimodal", "prompt_token_ids": [3]}
        ])
        .to_string();
        let adapters = load_adapters(&text, &ParseConfig::default()).unwrap();

        let kinds: Vec<_> = adapters.iter().map(InputsAdapter::kind).collect();
        assert_eq!(kinds, [InputsKind::Token, InputsKind::Multimodal]);
    }

    #[test]
    fn test_load_reports_failing_index() {
        let text = json!([
            {"type": "token", "prompt_token_ids": [1]},
            {"type": "token", "prompt_token_ids": [1, "x"]}
        ])
        .to_string();
        let config = ParseConfig::new(ListCheck::All);
        let error = load_adapters(&text, &config).unwrap_err();

        assert!(format!("{error:#}").contains("index 1"));
    }

    #[test]
    fn test_load_rejects_empty_array() {
        assert!(load_adapters("[]", &ParseConfig::default()).is_err());
        assert!(load_adapters("not json", &ParseConfig::default()).is_err());
    }

    #[test]
    fn test_render_json_lines() {
        let text = json!([
            {"type": "token", "prompt_token_ids": [1], "prompt": "a"},
            {"type": "token", "prompt_token_ids": [2], "prompt": "b"}
        ])
        .to_string();
        let adapters = load_adapters(&text, &ParseConfig::default()).unwrap();
        let rendered = render(&adapters, &InspectConfig::new("-")).unwrap();

        let lines: Vec<Value> = rendered
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["prompt"], "a");
        assert_eq!(lines[1]["prompt_token_ids"], json!([2]));
        assert_eq!(lines[1]["mm_processor_kwargs"], json!({}));
    }

    #[test]
    fn test_render_pretty_single_object() {
        let adapters = load_adapters(MULTIMODAL, &ParseConfig::default()).unwrap();
        let config = InspectConfig::new("-").with_format(OutputFormat::Pretty);
        let rendered = render(&adapters, &config).unwrap();

        assert!(rendered.contains('\n'));
        let view: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(view["kind"], "multimodal");
        assert_eq!(view["multi_modal_data"], view["multi_modal_inputs"]);
    }

    #[test]
    fn test_render_summarized_payloads() {
        let adapters = load_adapters(MULTIMODAL, &ParseConfig::default()).unwrap();
        let config = InspectConfig::new("-").with_summarize(true);
        let view: Value = serde_json::from_str(&render(&adapters, &config).unwrap()).unwrap();

        assert_eq!(
            view["multi_modal_inputs"],
            json!({
                "pixel_values": [["number", "number"], ["number", "number"]],
                "image_sizes": [["integer", "integer"]]
            })
        );
        assert_eq!(
            view["multi_modal_placeholders"],
            json!({"image": [{"offset": "integer", "length": "integer"}]})
        );
        assert_eq!(view["prompt_token_ids"], json!([1, 32000, 32000, 2]));
        assert_eq!(view["mm_processor_kwargs"], json!({}));
    }
}
