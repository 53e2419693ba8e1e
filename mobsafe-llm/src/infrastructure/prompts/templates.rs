use serde_json::{Value, json};

pub const SCAN_SYSTEM_PROMPT: &str = r#"You are the analysis engine of MobSafe, a mobile security scanner.
You produce device security reports as JSON that strictly follows the provided response schema.
Severity and status values must be one of the listed enum values. Counts are non-negative integers.
"#;

pub const SCAN_REPORT_PROMPT: &str = r#"Simulate a mobile security scan for a {device} device and generate a realistic security report.
Randomly decide whether the device has threats or is safe, leaning slightly towards finding minor but interesting threats.
If threats are found, list 1 to 3 vulnerabilities such as "Outdated OS", "Suspicious APK Permissions", "Phishing SMS detected" or "Unusual Network Traffic".
Give every vulnerability a unique id and specific remediation steps.
Set threatsDetected to the number of listed vulnerabilities and scanDate to {scan_date}.
The response must strictly adhere to the JSON schema.
"#;

pub struct PromptBuilder;

impl PromptBuilder {
    /// Fill the report prompt in one pass, so placeholder text inside a
    /// device descriptor is kept literally.
    pub fn build_scan_prompt(device: &str, scan_date: &str) -> String {
        let placeholders = [("{device}", device), ("{scan_date}", scan_date)];
        let mut prompt =
            String::with_capacity(SCAN_REPORT_PROMPT.len() + device.len() + scan_date.len());
        let mut rest = SCAN_REPORT_PROMPT;

        while let Some(open) = rest.find('{') {
            prompt.push_str(&rest[..open]);
            let tail = &rest[open..];
            match placeholders.iter().find(|(key, _)| tail.starts_with(key)) {
                Some((key, value)) => {
                    prompt.push_str(value);
                    rest = &tail[key.len()..];
                }
                None => {
                    prompt.push('{');
                    rest = &tail[1..];
                }
            }
        }
        prompt.push_str(rest);
        prompt
    }

    /// Response schema for `SecurityReport`, in the OpenAPI subset Gemini accepts.
    pub fn security_report_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "overallStatus": {
                    "type": "STRING",
                    "enum": ["LOW", "MEDIUM", "HIGH", "CRITICAL", "SAFE"]
                },
                "scanDate": { "type": "STRING" },
                "scannedFilesCount": { "type": "INTEGER" },
                "threatsDetected": { "type": "INTEGER" },
                "summary": { "type": "STRING" },
                "vulnerabilities": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": { "type": "STRING" },
                            "name": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "severity": {
                                "type": "STRING",
                                "enum": ["LOW", "MEDIUM", "HIGH", "CRITICAL"]
                            },
                            "remediation": { "type": "STRING" }
                        },
                        "required": ["id", "name", "description", "severity", "remediation"]
                    }
                }
            },
            "required": [
                "overallStatus",
                "scanDate",
                "scannedFilesCount",
                "threatsDetected",
                "summary",
                "vulnerabilities"
            ]
        })
    }
}
