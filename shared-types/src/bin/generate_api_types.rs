use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Chat and NER types
    types.push(clean_type(ChatRequest::export_to_string()?));
    types.push(clean_type(ChatResponse::export_to_string()?));
    types.push(clean_type(NerRequest::export_to_string()?));
    types.push(clean_type(Entity::export_to_string()?));
    types.push(clean_type(NerResponse::export_to_string()?));
    types.push(clean_type(ExtractDatesRequest::export_to_string()?));
    types.push(clean_type(ExtractDatesResponse::export_to_string()?));

    // Calendar types
    types.push(clean_type(EventDateTime::export_to_string()?));
    types.push(clean_type(CalendarEvent::export_to_string()?));
    types.push(clean_type(CalendarEventDraft::export_to_string()?));
    types.push(clean_type(EventsResponse::export_to_string()?));
    types.push(clean_type(CreatedEvent::export_to_string()?));
    types.push(clean_type(CreatedEventsResponse::export_to_string()?));

    // Email sync types
    types.push(clean_type(EmailMessage::export_to_string()?));
    types.push(clean_type(SyncEventsRequest::export_to_string()?));
    types.push(clean_type(SyncEventsResponse::export_to_string()?));

    // OAuth and settings types
    types.push(clean_type(InitiateOAuthResponse::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(ApiKeyConfig::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));
    types.push(clean_type(UpdateApiKeysRequest::export_to_string()?));

    let output_dir = Path::new("../frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Types that reference others (CalendarEvent uses EventDateTime) keep their imports
    let lines: Vec<&str> = type_def.lines().collect();
    let has_import = lines
        .iter()
        .any(|line| line.trim().starts_with("import type"));

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.starts_with("import type") {
                return has_import;
            }
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
