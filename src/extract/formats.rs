use std::io::Read;

use super::ExtractError;

pub fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Decode(e.to_string()))
}

/// Render a CSV file as an aligned plain-text table. Quoted fields
/// (including embedded delimiters and doubled quotes) are handled.
pub fn csv_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let content = decode_utf8(bytes)?;
    let rows: Vec<Vec<String>> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_csv_line(line, ','))
        .collect();
    if rows.is_empty() {
        return Ok(String::new());
    }

    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, field) in row.iter().enumerate() {
            widths[i] = widths[i].max(field.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            let field = row.get(i).map(|s| s.as_str()).unwrap_or("");
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(field);
            // Pad every column but the last so columns line up
            if i + 1 < columns {
                for _ in field.chars().count()..*width {
                    line.push(' ');
                }
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

/// Parse a single CSV line, handling quoted fields
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Pretty-print JSON so structure survives as readable text.
pub fn json_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Extract the text layer of a PDF from in-memory bytes. Quality varies by
/// PDF (text layer vs scanned images); scanned pages come back empty.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Pull paragraph text out of a DOCX archive (`word/document.xml`).
pub fn docx_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let xml = read_zip_entry(bytes, "word/document.xml")?;
    Ok(plaintext_from_ooxml(&xml, "</w:p>"))
}

/// Pull text runs out of every slide of a PPTX archive, in slide order.
pub fn pptx_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| ExtractError::Archive(e.to_string()))?;

    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(|n| n.to_string())
        .collect();
    // slide1.xml, slide2.xml, ...: numeric order, not lexicographic
    slide_names.sort_by_key(|n| slide_number(n));

    let mut out = String::new();
    for name in slide_names {
        let mut entry = archive
            .by_name(&name)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;
        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| ExtractError::Decode(e.to_string()))?;
        let text = plaintext_from_ooxml(&xml, "</a:p>");
        if !text.trim().is_empty() {
            out.push_str(&text);
            out.push('\n');
        }
    }
    Ok(out)
}

fn slide_number(name: &str) -> usize {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(usize::MAX)
}

fn read_zip_entry(bytes: &[u8], entry_name: &str) -> Result<String, ExtractError> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| ExtractError::Archive(e.to_string()))?;
    let mut entry = archive
        .by_name(entry_name)
        .map_err(|e| ExtractError::Archive(format!("{entry_name}: {e}")))?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| ExtractError::Decode(e.to_string()))?;
    Ok(content)
}

/// Strip markup from an OOXML body: paragraph close tags become newlines,
/// every other tag is dropped, and basic XML entities are unescaped.
fn plaintext_from_ooxml(xml: &str, paragraph_close: &str) -> String {
    let with_breaks = xml.replace(paragraph_close, "\n");
    let mut out = String::with_capacity(with_breaks.len() / 4);
    let mut in_tag = false;
    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    let unescaped = out
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    unescaped
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            for (name, content) in entries {
                writer.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_csv_rendering() {
        let csv = b"name,role\nalice,admin\nbob,viewer";
        let text = csv_to_text(csv).unwrap();
        assert!(text.contains("name"));
        assert!(text.contains("alice  admin"));
        assert!(text.contains("bob"));
    }

    #[test]
    fn test_csv_quoted_fields() {
        let csv = b"greeting,author\n\"hello, world\",\"said \"\"me\"\"\"";
        let text = csv_to_text(csv).unwrap();
        assert!(text.contains("hello, world"));
        assert!(text.contains("said \"me\""));
    }

    #[test]
    fn test_csv_empty() {
        assert_eq!(csv_to_text(b"").unwrap(), "");
    }

    #[test]
    fn test_json_pretty_printed() {
        let text = json_to_text(br#"{"b":1,"a":[2,3]}"#).unwrap();
        assert!(text.contains("\"a\": ["));
        assert!(text.lines().count() > 1);
    }

    #[test]
    fn test_json_invalid() {
        assert!(matches!(json_to_text(b"{not json"), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>First paragraph</w:t></w:r></w:p><w:p><w:r><w:t>Second &amp; third</w:t></w:r></w:p></w:body></w:document>"#;
        let bytes = make_zip(&[("word/document.xml", xml)]);
        let text = docx_to_text(&bytes).unwrap();
        assert_eq!(text, "First paragraph\nSecond & third");
    }

    #[test]
    fn test_docx_missing_document_xml() {
        let bytes = make_zip(&[("word/other.xml", "<x/>")]);
        assert!(matches!(docx_to_text(&bytes), Err(ExtractError::Archive(_))));
    }

    #[test]
    fn test_docx_not_a_zip() {
        assert!(matches!(docx_to_text(b"plain bytes"), Err(ExtractError::Archive(_))));
    }

    #[test]
    fn test_pptx_slides_in_order() {
        let slide = |t: &str| format!("<p:sld><a:p><a:r><a:t>{t}</a:t></a:r></a:p></p:sld>");
        let s1 = slide("Slide one");
        let s2 = slide("Slide two");
        let s10 = slide("Slide ten");
        let bytes = make_zip(&[
            ("ppt/slides/slide10.xml", s10.as_str()),
            ("ppt/slides/slide1.xml", s1.as_str()),
            ("ppt/slides/slide2.xml", s2.as_str()),
        ]);
        let text = pptx_to_text(&bytes).unwrap();
        let one = text.find("Slide one").unwrap();
        let two = text.find("Slide two").unwrap();
        let ten = text.find("Slide ten").unwrap();
        assert!(one < two && two < ten);
    }

    #[test]
    fn test_pdf_invalid_bytes() {
        assert!(matches!(pdf_to_text(b"not a pdf"), Err(ExtractError::Parse(_))));
    }
}
