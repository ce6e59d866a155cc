use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::font_metrics::FontWeight;
use super::style::{Rgb, TextStyle, PAGE_HEIGHT, PAGE_WIDTH};
use super::surface::{DocumentSurface, RenderError};

/// `DocumentSurface` backed by `lopdf`. Uses the standard Helvetica faces, so no font
/// data is embedded; text is encoded as WinAnsi.
pub struct PdfSurface {
    title: String,
    pages: Vec<Vec<Operation>>,
    current: Option<usize>,
}

impl PdfSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
            current: None,
        }
    }

    fn ops(&mut self) -> Result<&mut Vec<Operation>, RenderError> {
        let index = self.current.ok_or(RenderError::NoPage)?;
        self.pages.get_mut(index).ok_or(RenderError::MissingPage(index))
    }
}

impl DocumentSurface for PdfSurface {
    fn add_page(&mut self) -> usize {
        self.pages.push(Vec::new());
        let index = self.pages.len() - 1;
        self.current = Some(index);
        index
    }

    fn select_page(&mut self, index: usize) -> Result<(), RenderError> {
        if index >= self.pages.len() {
            return Err(RenderError::MissingPage(index));
        }
        self.current = Some(index);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn text(&mut self, x: f32, y: f32, style: &TextStyle, text: &str) -> Result<(), RenderError> {
        let ops = self.ops()?;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![style.weight.resource_name().into(), Object::Real(style.size)],
        ));
        ops.push(fill_color(style.color));
        ops.push(Operation::new(
            "Td",
            vec![Object::Real(x), Object::Real(PAGE_HEIGHT - y)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(text))],
        ));
        ops.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    ) -> Result<(), RenderError> {
        let ops = self.ops()?;
        ops.push(fill_color(color));
        ops.push(Operation::new(
            "re",
            vec![
                Object::Real(x),
                Object::Real(PAGE_HEIGHT - y - height),
                Object::Real(width),
                Object::Real(height),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        Ok(())
    }

    fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    ) -> Result<(), RenderError> {
        let ops = self.ops()?;
        ops.push(Operation::new("w", vec![Object::Real(width)]));
        ops.push(Operation::new(
            "RG",
            vec![
                Object::Real(color.r),
                Object::Real(color.g),
                Object::Real(color.b),
            ],
        ));
        ops.push(Operation::new(
            "m",
            vec![Object::Real(from.0), Object::Real(PAGE_HEIGHT - from.1)],
        ));
        ops.push(Operation::new(
            "l",
            vec![Object::Real(to.0), Object::Real(PAGE_HEIGHT - to.1)],
        ));
        ops.push(Operation::new("S", vec![]));
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        if self.pages.is_empty() {
            return Err(RenderError::NoPage);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = |doc: &mut Document, weight: FontWeight| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => weight.base_font(),
                "Encoding" => "WinAnsiEncoding",
            })
        };
        let regular_id = font_id(&mut doc, FontWeight::Regular);
        let bold_id = font_id(&mut doc, FontWeight::Bold);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FontWeight::Regular.resource_name() => regular_id,
                FontWeight::Bold.resource_name() => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let encoded = Content { operations }
                .encode()
                .map_err(|e| RenderError::Serialize(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(&self.title)),
            "Producer" => Object::string_literal(concat!("report-api ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Serialize(e.to_string()))?;
        Ok(bytes)
    }
}

fn fill_color(color: Rgb) -> Operation {
    Operation::new(
        "rg",
        vec![
            Object::Real(color.r),
            Object::Real(color.g),
            Object::Real(color.b),
        ],
    )
}

/// Encodes text for the standard fonts' WinAnsi (cp1252) encoding.
///
/// Latin-1 maps byte for byte; the cp1252 punctuation block covers typographic quotes,
/// dashes, the bullet, the ellipsis and the euro sign. Anything else becomes `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::style::{ACCENT, BODY};

    #[test]
    fn test_win_ansi_latin1_and_punctuation() {
        assert_eq!(win_ansi("Olá"), vec![b'O', b'l', 0xE1]);
        assert_eq!(win_ansi("ção"), vec![0xE7, 0xE3, b'o']);
        assert_eq!(win_ansi("\u{2022} \u{2014}"), vec![0x95, b' ', 0x97]);
        assert_eq!(win_ansi("“ok”"), vec![0x93, b'o', b'k', 0x94]);
    }

    #[test]
    fn test_win_ansi_unmappable_becomes_question_mark() {
        assert_eq!(win_ansi("漢字"), b"??".to_vec());
        assert_eq!(win_ansi("a\u{1F600}b"), b"a?b".to_vec());
    }

    #[test]
    fn test_drawing_without_page_fails() {
        let mut surface = PdfSurface::new("t");
        assert!(matches!(
            surface.text(0.0, 0.0, &BODY, "x"),
            Err(RenderError::NoPage)
        ));
        assert!(matches!(
            surface.select_page(0),
            Err(RenderError::MissingPage(0))
        ));
        assert!(matches!(surface.finish(), Err(RenderError::NoPage)));
    }

    #[test]
    fn test_finish_produces_loadable_pdf() {
        let mut surface = PdfSurface::new("Relatório");
        surface.add_page();
        surface.text(56.0, 100.0, &BODY, "Página 1 / 2").unwrap();
        surface.add_page();
        surface.fill_rect(56.0, 120.0, 100.0, 9.0, ACCENT).unwrap();
        surface
            .line((56.0, 800.0), (539.0, 800.0), 0.5, ACCENT)
            .unwrap();
        surface.select_page(0).unwrap();
        surface.text(56.0, 120.0, &BODY, "(parens) and \\").unwrap();
        assert_eq!(surface.page_count(), 2);

        let bytes = surface.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
