// src/transcribe/prompt.rs
// Instruction builder for the subtitle request

/// Build the natural-language instruction sent alongside the media payload.
/// Assembly is deterministic: the same language and glossary always produce
/// byte-identical text. The glossary clause is included only when terms exist.
pub fn build_instruction(language: &str, glossary: &[String]) -> String {
    let mut rules: Vec<String> = Vec::new();

    rules.push(format!("Transcribe in {}.", language_phrase(language)));
    rules.push(
        "Format every cue exactly as:\n\
         [sequence number]\n\
         [HH:MM:SS,mmm --> HH:MM:SS,mmm]\n\
         [caption text]\n\
         with one blank line between cues and sequence numbers starting at 1."
            .to_string(),
    );
    if !glossary.is_empty() {
        rules.push(format!(
            "Prefer the correct spelling and casing of these terms whenever they occur: {}.",
            glossary.join(", ")
        ));
    }
    rules.push("Align every timestamp tightly with the spoken audio.".to_string());
    rules.push("Output only the SRT body, with no commentary before or after it.".to_string());

    let numbered = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a professional subtitle transcriber.\n\
         Task: transcribe the attached recording into accurate subtitles, strictly following the SRT format.\n\n\
         Rules:\n{}",
        numbered
    )
}

fn language_phrase(language: &str) -> &'static str {
    match language {
        "zh-tw" => "Traditional Chinese",
        "en" => "English",
        _ => "the language spoken in the recording",
    }
}
