/// Standard block written ahead of the release sections
pub const PREAMBLE: &str = "# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).
";

/// Prior release sections of an existing changelog, without its preamble
pub fn prior_sections(existing: &str) -> &str {
    let mut offset = 0;
    for line in existing.split_inclusive('\n') {
        if line.starts_with("## ") {
            return &existing[offset..];
        }
        offset += line.len();
    }
    ""
}

/// Build the full changelog text with `section` ahead of every prior release
pub fn prepend_release(existing: Option<&str>, section: &str) -> String {
    let prior = existing.map(prior_sections).unwrap_or("").trim();
    let section = section.trim();

    let mut out = String::with_capacity(PREAMBLE.len() + section.len() + prior.len() + 4);
    out.push_str(PREAMBLE);
    out.push('\n');
    out.push_str(section);
    out.push('\n');
    if !prior.is_empty() {
        out.push('\n');
        out.push_str(prior);
        out.push('\n');
    }
    out
}
