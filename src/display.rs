//! Text and JSON output for a built thread tree.

use std::io::{self, Write};

use crate::models::{Message, RenderedEntry};
use crate::threading::ThreadTree;

/// Format one message as an indented line.
pub fn format_line(message: &Message, depth: usize, indent: usize) -> String {
    let id = match &message.message_id {
        Some(id) => format!("<{}>", id),
        None => "(no id)".to_string(),
    };
    let date = message.date.format("%Y-%m-%d %H:%M");

    let mut line = format!("{:width$}{} {}", "", id, message.subject, width = depth * indent);
    if message.author.is_empty() {
        line.push_str(&format!(" ({})", date));
    } else {
        line.push_str(&format!(" ({}, {})", message.author, date));
    }
    line
}

/// Write the tree as one indented line per message.
pub fn write_text<W: Write>(tree: &ThreadTree<'_, Message>, indent: usize, out: &mut W) -> io::Result<()> {
    for entry in tree.render() {
        writeln!(out, "{}", format_line(entry.message, entry.depth, indent))?;
    }
    Ok(())
}

/// Serialize the rendered tree as a JSON array of `{depth, message}`.
pub fn to_json(tree: &ThreadTree<'_, Message>) -> serde_json::Result<String> {
    let entries: Vec<RenderedEntry<'_>> = tree
        .render()
        .map(|entry| RenderedEntry {
            depth: entry.depth,
            message: entry.message,
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Serialize per-thread summaries as a JSON array.
pub fn summaries_to_json(tree: &ThreadTree<'_, Message>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&tree.threads())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::{MessageIndex, OrderedMessages};
    use chrono::{TimeZone, Utc};

    fn message(id: Option<&str>, reply_to: Option<&str>, subject: &str, hour: u32) -> Message {
        Message::new(
            id.map(str::to_string),
            reply_to.map(str::to_string),
            subject,
            Utc.with_ymd_and_hms(2019, 2, 4, hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_format_line_indents_by_depth() {
        let mut reply = message(Some("b@x"), Some("a@x"), "Re: Plan", 9);
        reply.author = "Ada <ada@x>".to_string();

        assert_eq!(
            format_line(&reply, 2, 3),
            "      <b@x> Re: Plan (Ada <ada@x>, 2019-02-04 09:00)"
        );
    }

    #[test]
    fn test_format_line_without_id_or_author() {
        let anonymous = message(None, None, "Hello", 7);
        assert_eq!(format_line(&anonymous, 0, 2), "(no id) Hello (2019-02-04 07:00)");
    }

    #[test]
    fn test_write_text_and_json() {
        let messages = vec![
            message(Some("a@x"), None, "Plan", 8),
            message(Some("b@x"), Some("a@x"), "Re: Plan", 9),
        ];
        let mut sequence: OrderedMessages<'_, Message> = messages.iter().collect();
        let index = MessageIndex::from_messages(messages.iter());
        let tree = ThreadTree::build_from_sequence(&mut sequence, &index).unwrap();

        let mut out = Vec::new();
        write_text(&tree, 2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "<a@x> Plan (2019-02-04 08:00)\n  <b@x> Re: Plan (2019-02-04 09:00)\n"
        );

        let json: serde_json::Value = serde_json::from_str(&to_json(&tree).unwrap()).unwrap();
        assert_eq!(json[1]["depth"], 1);
        assert_eq!(json[1]["message"]["message_id"], "b@x");

        let summaries: serde_json::Value =
            serde_json::from_str(&summaries_to_json(&tree).unwrap()).unwrap();
        assert_eq!(summaries.as_array().unwrap().len(), 1);
        assert_eq!(summaries[0]["root_message_id"], "a@x");
    }
}
