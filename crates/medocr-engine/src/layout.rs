//! Turning recognised lines into paragraphs of text.

use medocr_protocol::Segment;

/// Join recognised lines into text, leaving a blank line between paragraphs.
///
/// A paragraph break is assumed wherever the vertical gap between two
/// consecutive lines is larger than the median line height.
pub fn join_lines(lines: &[Segment]) -> String {
    let threshold = median_height(lines);
    let mut text = String::new();

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            let gap = line.top() - lines[i - 1].bottom();
            if threshold > 0 && gap > threshold {
                text.push_str("\n\n");
            } else {
                text.push('\n');
            }
        }
        text.push_str(line.text.trim());
    }

    text
}

/// Split text into paragraphs on blank lines.
///
/// Lines inside a paragraph keep their line breaks. Whitespace-only
/// paragraphs are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }

    out
}

fn median_height(lines: &[Segment]) -> i32 {
    let mut heights: Vec<i32> = lines.iter().map(|l| l.height()).filter(|h| *h > 0).collect();
    if heights.is_empty() {
        return 0;
    }
    heights.sort_unstable();
    heights[heights.len() / 2]
}
