//! Unit tests for scan prompt construction

use mobsafe_llm::prompts::{PromptBuilder, SCAN_REPORT_PROMPT, SCAN_SYSTEM_PROMPT};

#[test]
fn test_scan_prompt_substitutes_placeholders() {
    let prompt = PromptBuilder::build_scan_prompt("Android 14 Pixel 8", "2025-06-01T12:00:00.000Z");

    assert!(prompt.contains("Android 14 Pixel 8"));
    assert!(prompt.contains("2025-06-01T12:00:00.000Z"));
    assert!(!prompt.contains("{device}"));
    assert!(!prompt.contains("{scan_date}"));
}

#[test]
fn test_scan_prompt_keeps_placeholder_text_in_device() {
    let device = "Pixel {scan_date} {device}";
    let prompt = PromptBuilder::build_scan_prompt(device, "2025-06-01T12:00:00.000Z");

    assert!(prompt.contains("Pixel {scan_date} {device}"));
    assert_eq!(
        prompt.matches("2025-06-01T12:00:00.000Z").count(),
        SCAN_REPORT_PROMPT.matches("{scan_date}").count()
    );
}

#[test]
fn test_scan_prompt_templates_have_placeholders() {
    assert!(SCAN_REPORT_PROMPT.contains("{device}"));
    assert!(SCAN_REPORT_PROMPT.contains("{scan_date}"));
    assert!(SCAN_SYSTEM_PROMPT.contains("JSON"));
}

#[test]
fn test_schema_requires_every_report_field() {
    let schema = PromptBuilder::security_report_schema();
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();

    for field in [
        "overallStatus",
        "scanDate",
        "scannedFilesCount",
        "threatsDetected",
        "summary",
        "vulnerabilities",
    ] {
        assert!(required.contains(&field), "{field} should be required");
    }
}

#[test]
fn test_schema_enumerates_severities() {
    let schema = PromptBuilder::security_report_schema();

    let statuses = schema["properties"]["overallStatus"]["enum"].as_array().unwrap();
    assert_eq!(statuses.len(), 5);
    assert!(statuses.iter().any(|s| s == "SAFE"));

    let severities = schema["properties"]["vulnerabilities"]["items"]["properties"]["severity"]
        ["enum"]
        .as_array()
        .unwrap();
    assert_eq!(severities.len(), 4);
    assert!(!severities.iter().any(|s| s == "SAFE"));
}
