//! Output formatting for history and user listings

use std::io::Write;

use libstylecast::types::{Transformation, User};

const PREVIEW_CHARS: usize = 60;

/// Quote a CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// First `PREVIEW_CHARS` characters on one line
pub fn preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

pub fn write_transformations(
    out: &mut impl Write,
    rows: &[Transformation],
    format: &str,
) -> anyhow::Result<()> {
    match format {
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(rows)?)?,
        "jsonl" => {
            for row in rows {
                writeln!(out, "{}", serde_json::to_string(row)?)?;
            }
        }
        "csv" => {
            writeln!(
                out,
                "id,created_at,persona,verbosity,api_provider,username,input_text,output_text"
            )?;
            for row in rows {
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{}",
                    row.id,
                    row.created_at,
                    row.persona.as_deref().unwrap_or(""),
                    row.verbosity_level,
                    row.api_provider.as_deref().unwrap_or(""),
                    row.username.as_deref().unwrap_or(""),
                    csv_field(&row.input_text),
                    csv_field(&row.output_text),
                )?;
            }
        }
        _ => {
            // Empty results print nothing
            for row in rows {
                let persona = row.persona.as_deref().unwrap_or("-");
                match &row.username {
                    Some(user) => writeln!(
                        out,
                        "{} | #{} | {} | {} | level {}",
                        row.created_at, row.id, user, persona, row.verbosity_level
                    )?,
                    None => writeln!(
                        out,
                        "{} | #{} | {} | level {}",
                        row.created_at, row.id, persona, row.verbosity_level
                    )?,
                }
                writeln!(out, "  in:  {}", preview(&row.input_text))?;
                writeln!(out, "  out: {}", preview(&row.output_text))?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

pub fn write_users(out: &mut impl Write, users: &[User], format: &str) -> anyhow::Result<()> {
    match format {
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(users)?)?,
        "jsonl" => {
            for user in users {
                writeln!(out, "{}", serde_json::to_string(user)?)?;
            }
        }
        "csv" => {
            writeln!(out, "id,username,email,is_admin,created_at")?;
            for user in users {
                writeln!(
                    out,
                    "{},{},{},{},{}",
                    user.id,
                    csv_field(&user.username),
                    csv_field(&user.email),
                    user.is_admin,
                    user.created_at.as_deref().unwrap_or(""),
                )?;
            }
        }
        _ => {
            for user in users {
                let role = if user.is_admin { "admin" } else { "user" };
                writeln!(
                    out,
                    "#{:<5} {:<20} {:<30} {}",
                    user.id, user.username, user.email, role
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, input: &str, output: &str) -> Transformation {
        Transformation {
            id,
            input_text: input.to_string(),
            output_text: output.to_string(),
            verbosity_level: 2,
            created_at: "2024-05-13 09:30:00".to_string(),
            persona: Some("friedman".to_string()),
            api_provider: Some("openai".to_string()),
            user_id: Some(2),
            username: None,
        }
    }

    fn render(rows: &[Transformation], format: &str) -> String {
        let mut out = Vec::new();
        write_transformations(&mut out, rows, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let long = "ü".repeat(70);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(preview("two\nlines"), "two lines");
    }

    #[test]
    fn test_csv_escapes_quotes_and_commas() {
        let csv = render(&[row(7, "He said \"hi\", twice", "ok")], "csv");
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,created_at"));
        assert_eq!(
            lines.next().unwrap(),
            "7,2024-05-13 09:30:00,friedman,2,openai,,\"He said \"\"hi\"\", twice\",\"ok\""
        );
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let out = render(&[row(1, "a", "A"), row(2, "b", "B")], "jsonl");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: Transformation = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.id, 2);
    }

    #[test]
    fn test_text_empty_prints_nothing() {
        assert_eq!(render(&[], "text"), "");
    }

    #[test]
    fn test_text_shows_author_on_admin_rows() {
        let mut r = row(3, "in", "out");
        r.username = Some("alice".to_string());
        let out = render(&[r], "text");
        assert!(out.starts_with("2024-05-13 09:30:00 | #3 | alice | friedman | level 2"));
        assert!(out.contains("  out: out"));
    }

    #[test]
    fn test_users_csv() {
        let users = vec![User {
            id: 1,
            username: "admin".to_string(),
            email: "root@example.com".to_string(),
            is_admin: true,
            created_at: None,
        }];
        let mut out = Vec::new();
        write_users(&mut out, &users, "csv").unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().nth(1), Some("1,\"admin\",\"root@example.com\",true,"));
    }
}
