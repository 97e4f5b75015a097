// fund_report_core/src/html.rs

//! Minimal HTML document writer for reports.

use std::io::Write;

const TITLE_PREFIX: &str = "Fund Performance Report:";

pub fn write_header<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "<HTML>")?;
    writeln!(out, "<HEAD>")?;
    writeln!(out, "<TITLE>{}{}</TITLE>", TITLE_PREFIX, escape(title))?;
    writeln!(out, "</HEAD>\n")?;
    writeln!(out, "<BODY>\n")?;
    Ok(())
}

pub fn write_footer<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "</BODY>\n")?;
    write!(out, "</HTML>")?;
    Ok(())
}

pub fn write_heading<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "<H2>{}{}</H2>", TITLE_PREFIX, escape(title))
}

/// Embeds an image by relative path, optionally with a fixed width.
pub fn write_image<W: Write>(out: &mut W, src: &str, width: Option<u32>) -> std::io::Result<()> {
    match width {
        Some(width) => writeln!(out, "<IMG SRC='./{}' width={}/>", escape(src), width),
        None => writeln!(out, "<IMG SRC='./{}'/>", escape(src)),
    }
}

pub fn write_break<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "<BR/>\n")
}

/// Wraps `text` in `<pre>`, escaping markup characters.
pub fn write_preformatted<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    writeln!(out, "<pre>{}</pre>", escape(text))
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
