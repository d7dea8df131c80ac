// ABOUTME: Generates the default SMIL presentation for a message body that lacks one
// ABOUTME: One slide: an Image region for pictures and video, a Text region below it

use crate::body::{PduBody, PduPart};
use crate::codec::CodecError;
use crate::datatypes::ContentType;
use crate::datatypes::content_type::APPLICATION_SMIL;
use std::fmt::Write;
use tracing::trace;

/// Content-ID given to a generated SMIL part
pub const SMIL_CONTENT_ID: &str = "smil";
/// Content-Location given to a generated SMIL part
pub const SMIL_LOCATION: &str = "smil.xml";

const IMAGE_REGION: &str =
    r#"<region id="Image" top="0" left="0" height="80%" width="100%" fit="meet"/>"#;
const TEXT_REGION: &str =
    r#"<region id="Text" top="80%" left="0" height="20%" width="100%" fit="scroll"/>"#;
const SLIDE_DURATION: &str = "5000ms";

/// Whether the body already carries a presentation part
pub fn has_smil(body: &PduBody) -> bool {
    body.iter().any(|part| part.content_type().is_smil())
}

/// The name a SMIL element uses to refer to `part`: its Content-Location,
/// else its Content-ID
fn part_src(part: &PduPart) -> Option<&str> {
    part.content_location().or_else(|| part.content_id())
}

/// Give every part without a Content-Location one, from its file name or
/// made up from its media type, and every part without a Content-ID the
/// location minus its extension. Names stay unique within the body.
pub fn name_parts(body: &mut PduBody) {
    for index in 0..body.len() {
        let part = &body.parts()[index];
        let location = match part.content_location() {
            Some(location) => location.to_owned(),
            None => {
                let base = part
                    .filename()
                    .filter(|name| !name.contains('\0'))
                    .map(str::to_owned)
                    .unwrap_or_else(|| generated_location(part.content_type(), index));
                let location = unique(base, |candidate| {
                    body.part_by_content_location(candidate).is_some()
                });
                trace!(%location, index, "named part");
                body.parts_mut()[index].set_content_location(location.clone());
                location
            }
        };
        if body.parts()[index].content_id().is_none() {
            let stem = location
                .rsplit_once('.')
                .filter(|(stem, _)| !stem.is_empty())
                .map_or(location.as_str(), |(stem, _)| stem);
            let id = unique(stem.to_owned(), |candidate| {
                candidate == SMIL_CONTENT_ID || body.part_by_content_id(candidate).is_some()
            });
            body.parts_mut()[index].set_content_id(id);
        }
    }
}

/// `text_0.txt`, `image_1.png`, ... after the media type
fn generated_location(content_type: &ContentType, index: usize) -> String {
    let media = content_type.media_type.to_ascii_lowercase();
    let (top, sub) = media.split_once('/').unwrap_or(("", ""));
    let is_token = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric());
    let extension = match media.as_str() {
        "text/plain" => "txt",
        "image/jpeg" | "image/jpg" => "jpg",
        "text/x-vcard" | "text/vcard" => "vcf",
        "text/x-vcalendar" => "vcs",
        "audio/mpeg" => "mp3",
        _ if is_token(sub) => sub,
        _ => "bin",
    };
    let prefix = if is_token(top) { top } else { "part" };
    format!("{prefix}_{index}.{extension}")
}

/// `base`, or `base` with `_1`, `_2`, ... before the extension until `taken`
/// rejects it
fn unique(base: String, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = base.clone();
    let mut n = 1;
    while taken(&candidate) {
        candidate = match base.rsplit_once('.') {
            Some((stem, extension)) => format!("{stem}_{n}.{extension}"),
            None => format!("{base}_{n}"),
        };
        n += 1;
    }
    candidate
}

/// Render a single-slide SMIL document referencing every presentable part.
/// Parts with neither a Content-Location nor a Content-ID are left out;
/// `ensure_smil` names them first.
pub fn build_smil(parts: &[PduPart]) -> String {
    let has_image = parts
        .iter()
        .any(|p| p.content_type().is_image() || p.content_type().is_video());
    let has_text = parts.iter().any(|p| p.content_type().is_text());

    let mut smil = String::from("<smil><head><layout>");
    smil.push_str(r#"<root-layout width="100%" height="100%"/>"#);
    if has_image {
        smil.push_str(IMAGE_REGION);
    }
    if has_text {
        smil.push_str(TEXT_REGION);
    }
    let _ = write!(smil, r#"</layout></head><body><par dur="{SLIDE_DURATION}">"#);

    for (index, part) in parts.iter().enumerate() {
        let Some(src) = part_src(part) else {
            trace!(index, "part has no name to reference");
            continue;
        };
        let src = xml_escape(src);
        let content_type = part.content_type();
        // Writing to a String cannot fail
        let _ = if content_type.is_image() {
            write!(smil, r#"<img src="{src}" region="Image"/>"#)
        } else if content_type.is_video() {
            write!(smil, r#"<video src="{src}" region="Image"/>"#)
        } else if content_type.is_audio() {
            write!(smil, r#"<audio src="{src}"/>"#)
        } else if content_type.is_text() {
            write!(smil, r#"<text src="{src}" region="Text"/>"#)
        } else {
            Ok(())
        };
    }

    smil.push_str("</par></body></smil>");
    smil
}

/// The generated SMIL document as a body part
pub fn smil_part(parts: &[PduPart]) -> Result<PduPart, CodecError> {
    PduPart::builder(ContentType::new(APPLICATION_SMIL))
        .content_id(SMIL_CONTENT_ID)
        .content_location(SMIL_LOCATION)
        .data(build_smil(parts))
        .build()
}

/// Prepend a generated SMIL part unless the body is empty or already has one,
/// naming the parts it references. Returns whether a part was added.
pub fn ensure_smil(body: &mut PduBody) -> Result<bool, CodecError> {
    if body.is_empty() || has_smil(body) {
        return Ok(false);
    }
    name_parts(body);
    let part = smil_part(body.parts())?;
    body.insert_part(0, part);
    Ok(true)
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(location: &str) -> PduPart {
        PduPart::builder(ContentType::new("image/jpeg"))
            .content_location(location)
            .data(vec![0xFFu8, 0xD8])
            .build()
            .unwrap()
    }

    #[test]
    fn text_only_layout() {
        let text = PduPart::builder(ContentType::new("text/plain"))
            .content_location("text_0.txt")
            .data("hi")
            .build()
            .unwrap();
        let smil = build_smil(&[text]);
        assert!(smil.contains(r#"id="Text""#));
        assert!(!smil.contains(r#"id="Image""#));
        assert!(smil.contains(r#"<text src="text_0.txt" region="Text"/>"#));
        assert!(smil.ends_with("</par></body></smil>"));
    }

    #[test]
    fn image_and_audio() {
        let audio = PduPart::builder(ContentType::new("audio/amr"))
            .content_id("<voice>")
            .build()
            .unwrap();
        let smil = build_smil(&[image("cat.jpg"), audio]);
        assert!(smil.contains(r#"<img src="cat.jpg" region="Image"/>"#));
        assert!(smil.contains(r#"<audio src="voice"/>"#));
        assert!(!smil.contains(r#"id="Text""#));
    }

    #[test]
    fn ensure_prepends_once() {
        let mut body: PduBody = [image("a.jpg")].into_iter().collect();
        assert!(ensure_smil(&mut body).unwrap());
        assert!(!ensure_smil(&mut body).unwrap());
        assert_eq!(body.len(), 2);
        let smil = body.part(0).unwrap();
        assert!(smil.content_type().is_smil());
        assert_eq!(smil.content_id(), Some(SMIL_CONTENT_ID));
        assert_eq!(smil.content_location(), Some(SMIL_LOCATION));
    }

    #[test]
    fn empty_body_gets_nothing() {
        let mut body = PduBody::new();
        assert!(!ensure_smil(&mut body).unwrap());
        assert!(body.is_empty());
    }

    fn srcs(smil: &str) -> Vec<&str> {
        smil.split(r#"src=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect()
    }

    #[test]
    fn unnamed_parts_are_named_before_rendering() {
        let mut body: PduBody = [
            PduPart::text("Hello World"),
            PduPart::builder(ContentType::new("image/png"))
                .data(vec![0x89u8, b'P'])
                .build()
                .unwrap(),
            image("text_0.txt"),
        ]
        .into_iter()
        .collect();
        assert!(ensure_smil(&mut body).unwrap());

        let text = body.part(1).unwrap();
        assert_eq!(text.content_location(), Some("text_0_1.txt"));
        assert_eq!(text.content_id(), Some("text_0_1"));
        let png = body.part(2).unwrap();
        assert_eq!(png.content_location(), Some("image_1.png"));
        assert_eq!(png.content_id(), Some("image_1"));

        let document = body.part(0).unwrap().text_content().unwrap();
        let srcs = srcs(&document);
        assert_eq!(srcs.len(), 3);
        for src in srcs {
            assert!(
                body.part_by_content_location(src).is_some()
                    || body.part_by_content_id(src).is_some(),
                "{src} names no part"
            );
        }
    }

    #[test]
    fn content_id_never_clashes_with_smil() {
        let mut body: PduBody = [image("smil.jpg")].into_iter().collect();
        ensure_smil(&mut body).unwrap();
        assert_eq!(body.part(1).unwrap().content_id(), Some("smil_1"));
    }

    #[test]
    fn nameless_parts_are_left_out() {
        let smil = build_smil(&[PduPart::text("x")]);
        assert!(srcs(&smil).is_empty());
    }

    #[test]
    fn src_is_escaped() {
        let smil = build_smil(&[image("a&b.jpg")]);
        assert!(smil.contains(r#"src="a&amp;b.jpg""#));
    }
}
