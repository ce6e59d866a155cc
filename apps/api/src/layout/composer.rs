//! Document Composer: lays the report out page by page on a `DocumentSurface`.
//!
//! Section sequence: cover, table of contents, participant summary, one section per
//! test (request order), roadmap (when non-empty), conclusion. Each named section
//! starts a new page. The contents page is reserved right after the cover and filled
//! once every section knows its starting page; footers are drawn last, when the total
//! page count is final.
//!
//! Pagination is a single downward cursor. Before each atomic element (a text line,
//! a progress bar row, a heading together with the first line after it) the composer
//! checks that the element plus `BREAK_THRESHOLD` fits above the bottom margin and
//! breaks the page otherwise.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::font_metrics::{get_metrics, wrap_lines};
use super::pdf::PdfSurface;
use super::style::*;
use super::surface::{DocumentSurface, RenderError};
use crate::generation::labels::Labels;
use crate::generation::models::{
    Lang, ParticipantProfile, ProfileField, TestKey, TestResult, TestResultSet,
};
use crate::generation::normalizer::{extract_chart_values, ChartValues};
use crate::generation::roadmap::Roadmap;

/// Everything the document needs, owned so rendering can move to a blocking thread.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub profile: ParticipantProfile,
    pub tests: TestResultSet,
    /// `None` or an empty roadmap omits the roadmap section.
    pub roadmap: Option<Roadmap>,
    /// Long-form narrative with `## ` headings and `- ` bullets.
    pub long_form: String,
    pub chart_values: ChartValues,
    pub generated_at: DateTime<Utc>,
}

impl DocumentInput {
    pub fn new(
        profile: ParticipantProfile,
        tests: TestResultSet,
        roadmap: Option<Roadmap>,
        long_form: String,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let chart_values = extract_chart_values(&tests);
        Self {
            profile,
            tests,
            roadmap,
            long_form,
            chart_values,
            generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    /// One-based physical page number.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDocument {
    pub toc: Vec<TocEntry>,
    pub page_count: usize,
}

/// Composes the report onto a fresh PDF surface and serializes it.
pub fn render(input: &DocumentInput, lang: Lang) -> Result<Vec<u8>, RenderError> {
    let mut surface = PdfSurface::new(lang.labels().report_title);
    let composed = compose(&mut surface, input, lang)?;
    debug!(
        pages = composed.page_count,
        sections = composed.toc.len(),
        "Document composed"
    );
    surface.finish()
}

pub fn compose<S: DocumentSurface>(
    surface: &mut S,
    input: &DocumentInput,
    lang: Lang,
) -> Result<ComposedDocument, RenderError> {
    let mut composer = Composer {
        surface,
        labels: lang.labels(),
        y: MARGIN_TOP,
        toc: Vec::new(),
    };

    composer.cover(input)?;
    let toc_page = composer.new_page();
    composer.participant(&input.profile)?;
    for (key, result) in input.tests.iter() {
        composer.test_section(key, result, &input.chart_values)?;
    }
    if let Some(roadmap) = input.roadmap.as_ref().filter(|r| !r.is_empty()) {
        composer.roadmap(roadmap)?;
    }
    composer.conclusion(&input.long_form)?;
    composer.table_of_contents(toc_page)?;
    composer.footers()?;

    Ok(ComposedDocument {
        page_count: composer.surface.page_count(),
        toc: composer.toc,
    })
}

/// Footer page label, e.g. `Page 3 / 9`.
pub fn page_label(labels: &Labels, page: usize, total: usize) -> String {
    format!("{} {page} / {total}", labels.page)
}

struct Composer<'a, S: DocumentSurface> {
    surface: &'a mut S,
    labels: &'static Labels,
    /// Top of the next element on the current page.
    y: f32,
    toc: Vec<TocEntry>,
}

impl<'a, S: DocumentSurface> Composer<'a, S> {
    // ── Cursor and primitives ────────────────────────────────────────────────

    fn new_page(&mut self) -> usize {
        self.y = MARGIN_TOP;
        self.surface.add_page()
    }

    /// Breaks the page unless `height` plus the threshold fits below the cursor.
    /// A fresh page always accepts the element.
    fn ensure_space(&mut self, height: f32) {
        if self.y > MARGIN_TOP && self.y + height + BREAK_THRESHOLD > CONTENT_BOTTOM {
            self.new_page();
        }
    }

    fn text_line(&mut self, x: f32, style: &TextStyle, text: &str) -> Result<(), RenderError> {
        self.ensure_space(style.line_height());
        self.surface.text(x, self.y + style.size, style, text)?;
        self.y += style.line_height();
        Ok(())
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        for line in wrap_lines(text, style.weight, style.size, CONTENT_WIDTH) {
            self.text_line(MARGIN_X, style, &line)?;
        }
        self.y += PARAGRAPH_GAP;
        Ok(())
    }

    fn muted(&mut self, text: &str) -> Result<(), RenderError> {
        self.paragraph(text, &BODY.with_color(MUTED))
    }

    fn bullet(&mut self, text: &str) -> Result<(), RenderError> {
        let lines = wrap_lines(text, BODY.weight, BODY.size, CONTENT_WIDTH - BULLET_INDENT);
        for (i, line) in lines.iter().enumerate() {
            self.ensure_space(BODY.line_height());
            let baseline = self.y + BODY.size;
            if i == 0 {
                self.surface
                    .text(MARGIN_X + 2.0, baseline, &BODY.with_color(ACCENT), "\u{2022}")?;
            }
            self.surface
                .text(MARGIN_X + BULLET_INDENT, baseline, &BODY, line)?;
            self.y += BODY.line_height();
        }
        self.y += 2.0;
        Ok(())
    }

    /// Heading kept on the same page as the first body line that follows it.
    fn subheading(&mut self, text: &str) -> Result<(), RenderError> {
        let lines = wrap_lines(text, SUBHEADING.weight, SUBHEADING.size, CONTENT_WIDTH);
        let height =
            PARAGRAPH_GAP + lines.len() as f32 * SUBHEADING.line_height() + BODY.line_height();
        self.ensure_space(height);
        if self.y > MARGIN_TOP {
            self.y += PARAGRAPH_GAP;
        }
        for line in &lines {
            self.surface
                .text(MARGIN_X, self.y + SUBHEADING.size, &SUBHEADING, line)?;
            self.y += SUBHEADING.line_height();
        }
        Ok(())
    }

    /// Bold label in a fixed left column, value wrapped in the remaining width.
    fn field_row(&mut self, label: &str, value: &str) -> Result<(), RenderError> {
        let label = fit_text(label, &BODY_BOLD, FIELD_LABEL_WIDTH - 8.0);
        let lines = wrap_lines(
            value,
            BODY.weight,
            BODY.size,
            CONTENT_WIDTH - FIELD_LABEL_WIDTH,
        );
        for (i, line) in lines.iter().enumerate() {
            self.ensure_space(BODY.line_height());
            let baseline = self.y + BODY.size;
            if i == 0 {
                self.surface.text(MARGIN_X, baseline, &BODY_BOLD, &label)?;
            }
            self.surface
                .text(MARGIN_X + FIELD_LABEL_WIDTH, baseline, &BODY, line)?;
            self.y += BODY.line_height();
        }
        self.y += 2.0;
        Ok(())
    }

    /// One labeled bar row; never split across pages.
    fn progress_bar(&mut self, label: &str, value: f64) -> Result<(), RenderError> {
        self.ensure_space(BAR_ROW_HEIGHT);
        let percent = clamp_percent(value);
        let baseline = self.y + BODY.size;
        let track_x = MARGIN_X + BAR_LABEL_WIDTH;
        let bar_top = baseline - BAR_HEIGHT + 1.0;

        let label = fit_text(label, &BODY, BAR_LABEL_WIDTH - 8.0);
        self.surface.text(MARGIN_X, baseline, &BODY, &label)?;
        self.surface
            .fill_rect(track_x, bar_top, BAR_TRACK_WIDTH, BAR_HEIGHT, TRACK)?;
        let filled = BAR_TRACK_WIDTH * percent / 100.0;
        if filled > 0.0 {
            self.surface
                .fill_rect(track_x, bar_top, filled, BAR_HEIGHT, ACCENT)?;
        }
        self.surface.text(
            track_x + BAR_TRACK_WIDTH + 8.0,
            baseline,
            &BODY_BOLD,
            &format!("{}", percent.round() as i64),
        )?;

        self.y += BAR_ROW_HEIGHT;
        Ok(())
    }

    fn start_section(&mut self, title: &str) -> Result<(), RenderError> {
        let index = self.new_page();
        self.toc.push(TocEntry {
            title: title.to_string(),
            page: index + 1,
        });

        for line in wrap_lines(title, SECTION_TITLE.weight, SECTION_TITLE.size, CONTENT_WIDTH) {
            self.surface
                .text(MARGIN_X, self.y + SECTION_TITLE.size, &SECTION_TITLE, &line)?;
            self.y += SECTION_TITLE.line_height();
        }
        self.y += 4.0;
        self.surface
            .line((MARGIN_X, self.y), (PAGE_WIDTH - MARGIN_X, self.y), 1.0, ACCENT)?;
        self.y += SECTION_GAP;
        Ok(())
    }

    // ── Sections ─────────────────────────────────────────────────────────────

    fn cover(&mut self, input: &DocumentInput) -> Result<(), RenderError> {
        let l = self.labels;
        self.new_page();
        self.surface
            .fill_rect(0.0, 0.0, PAGE_WIDTH, COVER_BAND_HEIGHT, ACCENT)?;

        let mut y = 110.0;
        for line in wrap_lines(l.report_title, COVER_TITLE.weight, COVER_TITLE.size, CONTENT_WIDTH) {
            self.surface.text(MARGIN_X, y, &COVER_TITLE, &line)?;
            y += COVER_TITLE.line_height();
        }
        self.surface
            .text(MARGIN_X, y + 4.0, &COVER_SUBTITLE, l.cover_subtitle)?;

        self.y = COVER_BAND_HEIGHT + 48.0;
        let name = input
            .profile
            .field(ProfileField::Name)
            .unwrap_or_else(|| l.profile_unavailable.to_string());
        self.field_row(l.prepared_for, &name)?;
        let date = input.generated_at.format(l.date_format).to_string();
        self.field_row(l.generated_on, &date)?;

        self.y += SECTION_GAP;
        self.subheading(l.tests_included)?;
        if input.tests.is_empty() {
            self.muted(l.no_tests)?;
        }
        for key in input.tests.keys() {
            self.bullet(l.test_title(key))?;
        }
        Ok(())
    }

    fn participant(&mut self, profile: &ParticipantProfile) -> Result<(), RenderError> {
        let l = self.labels;
        self.start_section(l.participant_title)?;

        let mut rendered = false;
        for field in ProfileField::ALL {
            if let Some(value) = profile.field(field) {
                self.field_row(l.profile_field(field), &value)?;
                rendered = true;
            }
        }
        if !rendered {
            self.muted(l.profile_unavailable)?;
        }
        Ok(())
    }

    fn test_section(
        &mut self,
        key: TestKey,
        result: &TestResult,
        charts: &ChartValues,
    ) -> Result<(), RenderError> {
        let l = self.labels;
        self.start_section(l.test_title(key))?;

        if result.scores.is_empty() {
            self.muted(l.no_scores)?;
        } else {
            let rows: Vec<(String, f64)> = match key {
                TestKey::DiscInsight => axis_rows(&l.disc_axes, &charts.disc.values()),
                TestKey::Riasec => axis_rows(&l.riasec_axes, &charts.riasec.values()),
                TestKey::MultipleIntelligences => charts.intelligences.clone(),
                TestKey::Archetypes => result.scores.clone(),
            };
            for (label, value) in &rows {
                self.progress_bar(label, *value)?;
            }
            self.y += PARAGRAPH_GAP;
        }

        if key == TestKey::Archetypes {
            if let Some(name) = &charts.dominant_archetype {
                self.field_row(l.dominant_archetype, name)?;
            }
        }

        if !result.highlights.is_empty() {
            self.subheading(&capitalize(l.highlights))?;
            for item in &result.highlights {
                self.bullet(item)?;
            }
        } else if let Some(summary) = result.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            self.subheading(&capitalize(l.summary))?;
            self.paragraph(summary, &BODY)?;
        }
        Ok(())
    }

    fn roadmap(&mut self, roadmap: &Roadmap) -> Result<(), RenderError> {
        let l = self.labels;
        self.start_section(l.roadmap_title)?;

        if !roadmap.vision.trim().is_empty() {
            self.subheading(l.vision)?;
            self.paragraph(&roadmap.vision, &BODY)?;
        }

        for (i, phase) in roadmap.phases.iter().enumerate() {
            let title = match phase.title.trim() {
                "" => format!("{} {}", l.phase, i + 1),
                t => format!("{} {}: {t}", l.phase, i + 1),
            };
            self.subheading(&title)?;
            if !phase.timeframe.trim().is_empty() {
                self.field_row(l.timeframe, &phase.timeframe)?;
            }
            if !phase.focus.trim().is_empty() {
                self.field_row(l.focus, &phase.focus)?;
            }
            for step in phase.steps.iter().filter(|s| !s.trim().is_empty()) {
                self.bullet(step)?;
            }
        }

        self.bullet_list(l.habits, &roadmap.habits)?;
        self.bullet_list(l.support, &roadmap.support)?;

        if !roadmap.final_message.trim().is_empty() {
            self.subheading(l.final_message)?;
            self.paragraph(&roadmap.final_message, &BODY)?;
        }
        Ok(())
    }

    fn bullet_list(&mut self, title: &str, items: &[String]) -> Result<(), RenderError> {
        let items: Vec<&String> = items.iter().filter(|s| !s.trim().is_empty()).collect();
        if items.is_empty() {
            return Ok(());
        }
        self.subheading(title)?;
        for item in items {
            self.bullet(item)?;
        }
        Ok(())
    }

    /// Renders the long-form narrative. Recognized markup: `#` headings and `- ` or
    /// `* ` bullets; consecutive plain lines join into one paragraph.
    fn conclusion(&mut self, long_form: &str) -> Result<(), RenderError> {
        let title = self.labels.conclusion_title;
        self.start_section(title)?;

        let mut pending = String::new();
        for raw in long_form.lines() {
            let line = raw.trim();
            if let Some(heading) = heading_text(line) {
                self.flush_paragraph(&mut pending)?;
                self.subheading(heading)?;
            } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                self.flush_paragraph(&mut pending)?;
                self.bullet(item.trim())?;
            } else if line.is_empty() {
                self.flush_paragraph(&mut pending)?;
            } else {
                if !pending.is_empty() {
                    pending.push(' ');
                }
                pending.push_str(line);
            }
        }
        self.flush_paragraph(&mut pending)
    }

    fn flush_paragraph(&mut self, pending: &mut String) -> Result<(), RenderError> {
        if pending.trim().is_empty() {
            pending.clear();
            return Ok(());
        }
        let text = std::mem::take(pending);
        self.paragraph(&text, &BODY)
    }

    // ── Deferred passes ──────────────────────────────────────────────────────

    fn table_of_contents(&mut self, page: usize) -> Result<(), RenderError> {
        self.surface.select_page(page)?;
        let mut y = MARGIN_TOP;

        self.surface
            .text(MARGIN_X, y + SECTION_TITLE.size, &SECTION_TITLE, self.labels.contents)?;
        y += SECTION_TITLE.line_height() + 4.0;
        self.surface
            .line((MARGIN_X, y), (PAGE_WIDTH - MARGIN_X, y), 1.0, ACCENT)?;
        y += SECTION_GAP;

        let metrics = get_metrics(BODY.weight);
        for entry in &self.toc {
            let baseline = y + BODY.size;
            let number = entry.page.to_string();
            let number_width = metrics.width_pt(&number, BODY.size);
            let number_x = PAGE_WIDTH - MARGIN_X - number_width;
            let title = fit_text(&entry.title, &BODY, CONTENT_WIDTH - number_width - 24.0);
            let title_end = MARGIN_X + metrics.width_pt(&title, BODY.size);

            self.surface.text(MARGIN_X, baseline, &BODY, &title)?;
            self.surface
                .line((title_end + 6.0, baseline), (number_x - 6.0, baseline), 0.3, RULE)?;
            self.surface.text(number_x, baseline, &BODY, &number)?;
            y += BODY.line_height() + 6.0;
        }
        Ok(())
    }

    fn footers(&mut self) -> Result<(), RenderError> {
        let l = self.labels;
        let total = self.surface.page_count();
        let metrics = get_metrics(SMALL.weight);

        for index in 1..total {
            self.surface.select_page(index)?;
            self.surface.line(
                (MARGIN_X, FOOTER_RULE_Y),
                (PAGE_WIDTH - MARGIN_X, FOOTER_RULE_Y),
                0.5,
                RULE,
            )?;
            self.surface
                .text(MARGIN_X, FOOTER_BASELINE, &SMALL, l.report_title)?;
            let label = page_label(l, index + 1, total);
            let x = PAGE_WIDTH - MARGIN_X - metrics.width_pt(&label, SMALL.size);
            self.surface.text(x, FOOTER_BASELINE, &SMALL, &label)?;
        }
        Ok(())
    }
}

fn axis_rows(names: &[&str], values: &[f64]) -> Vec<(String, f64)> {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Maps a score onto the 0-100 bar scale. Non-finite scores count as zero.
fn clamp_percent(value: f64) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0) as f32
    } else {
        0.0
    }
}

/// `## Title` style markup. A `#` not followed by whitespace is ordinary text.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    if rest.len() == line.len() || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Truncates `text` with an ellipsis so it fits in `max_width` points.
fn fit_text(text: &str, style: &TextStyle, max_width: f32) -> String {
    let metrics = get_metrics(style.weight);
    if metrics.width_pt(text, style.size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - metrics.width_pt("\u{2026}", style.size);
    let mut out = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let w = metrics.measure_char(c) * style.size;
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    format!("{}\u{2026}", out.trim_end())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::labels::{EN, PT};
    use crate::generation::roadmap::Phase;
    use crate::layout::font_metrics::FontWeight;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Mark {
        Text {
            y: f32,
            weight: FontWeight,
            text: String,
        },
        Rect {
            width: f32,
            height: f32,
            color: Rgb,
        },
        Line,
    }

    #[derive(Default)]
    struct RecordingSurface {
        pages: Vec<Vec<Mark>>,
        current: Option<usize>,
    }

    impl RecordingSurface {
        fn push(&mut self, mark: Mark) -> Result<(), RenderError> {
            let index = self.current.ok_or(RenderError::NoPage)?;
            self.pages[index].push(mark);
            Ok(())
        }

        fn texts(&self, page: usize) -> Vec<&str> {
            self.pages[page]
                .iter()
                .filter_map(|m| match m {
                    Mark::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn all_texts(&self) -> Vec<&str> {
            (0..self.pages.len()).flat_map(|p| self.texts(p)).collect()
        }
    }

    impl DocumentSurface for RecordingSurface {
        fn add_page(&mut self) -> usize {
            self.pages.push(Vec::new());
            self.current = Some(self.pages.len() - 1);
            self.pages.len() - 1
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

        fn text(&mut self, _x: f32, y: f32, style: &TextStyle, text: &str) -> Result<(), RenderError> {
            self.push(Mark::Text {
                y,
                weight: style.weight,
                text: text.to_string(),
            })
        }

        fn fill_rect(
            &mut self,
            _x: f32,
            _y: f32,
            width: f32,
            height: f32,
            color: Rgb,
        ) -> Result<(), RenderError> {
            self.push(Mark::Rect {
                width,
                height,
                color,
            })
        }

        fn line(
            &mut self,
            _from: (f32, f32),
            _to: (f32, f32),
            _width: f32,
            _color: Rgb,
        ) -> Result<(), RenderError> {
            self.push(Mark::Line)
        }

        fn finish(self) -> Result<Vec<u8>, RenderError> {
            Ok(Vec::new())
        }
    }

    fn profile() -> ParticipantProfile {
        ParticipantProfile::from_value(&json!({
            "name": "Ana Souza",
            "age": 34,
            "city": "Recife",
            "interests": ["design", "music"]
        }))
        .unwrap()
    }

    fn tests_in_order() -> TestResultSet {
        TestResultSet::from_value(&json!({
            "riasec": {
                "results": {"R": 20, "I": 70, "A": 55, "S": 40, "E": 65, "C": 30},
                "summary": "Investigative and enterprising interests."
            },
            "disc-insight": {
                "results": {"D": 45, "I": 30, "S": 10, "C": 15},
                "highlights": ["Direct communicator", "Decides quickly"]
            },
            "multiple-intelligences": {"results": {"Logical": 80, "Linguistic": 60}},
            "archetypes": {"results": {"Hero": 70, "Sage": 85}}
        }))
        .unwrap()
    }

    fn roadmap() -> Roadmap {
        Roadmap {
            vision: "Lead a design team".to_string(),
            phases: vec![Phase {
                title: "Foundation".to_string(),
                timeframe: "Months 1-3".to_string(),
                focus: "Delegation".to_string(),
                steps: vec!["Find a mentor".to_string()],
            }],
            habits: vec!["Weekly review".to_string()],
            support: vec![],
            final_message: "Keep going.".to_string(),
        }
    }

    fn input(roadmap: Option<Roadmap>, long_form: &str) -> DocumentInput {
        DocumentInput::new(
            profile(),
            tests_in_order(),
            roadmap,
            long_form.to_string(),
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
        )
    }

    fn compose_recorded(input: &DocumentInput, lang: Lang) -> (RecordingSurface, ComposedDocument) {
        let mut surface = RecordingSurface::default();
        let composed = compose(&mut surface, input, lang).unwrap();
        (surface, composed)
    }

    const LONG_FORM: &str = "## Key strengths\nYou lead with clarity.\nYou decide fast.\n\n- Direct\n- Curious\n\nClosing words.";

    #[test]
    fn test_sections_follow_input_order() {
        let (_, composed) = compose_recorded(&input(Some(roadmap()), LONG_FORM), Lang::En);
        let titles: Vec<&str> = composed.toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                EN.participant_title,
                EN.riasec_title,
                EN.disc_title,
                EN.multiple_intelligences_title,
                EN.archetypes_title,
                EN.roadmap_title,
                EN.conclusion_title,
            ]
        );
    }

    #[test]
    fn test_absent_tests_have_no_section() {
        let tests = TestResultSet::from_value(&json!({
            "riasec": {"results": {"R": 20, "I": 70, "A": 55, "S": 40, "E": 65, "C": 30}},
            "disc-insight": {"results": {"D": 45, "I": 30, "S": 10, "C": 15}}
        }))
        .unwrap();
        let input = DocumentInput::new(
            profile(),
            tests,
            None,
            LONG_FORM.to_string(),
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
        );

        let (surface, composed) = compose_recorded(&input, Lang::En);
        let titles: Vec<&str> = composed.toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                EN.participant_title,
                EN.riasec_title,
                EN.disc_title,
                EN.conclusion_title,
            ]
        );
        let texts = surface.all_texts();
        assert!(!texts.contains(&EN.multiple_intelligences_title));
        assert!(!texts.contains(&EN.archetypes_title));
    }

    #[test]
    fn test_heading_markup_requires_space_after_hashes() {
        assert_eq!(heading_text("## Key strengths"), Some("Key strengths"));
        assert_eq!(heading_text("# Overview "), Some("Overview"));
        assert_eq!(heading_text("#1 priority is focus"), None);
        assert_eq!(heading_text("##"), None);
        assert_eq!(heading_text("Plain line"), None);
    }

    #[test]
    fn test_each_section_starts_on_new_page_after_cover_and_contents() {
        let (surface, composed) = compose_recorded(&input(Some(roadmap()), LONG_FORM), Lang::En);
        assert_eq!(composed.toc[0].page, 3);
        for pair in composed.toc.windows(2) {
            assert!(pair[1].page > pair[0].page);
        }
        assert_eq!(composed.page_count, surface.page_count());
        for entry in &composed.toc {
            assert!(surface.texts(entry.page - 1).contains(&entry.title.as_str()));
        }
    }

    #[test]
    fn test_roadmap_omitted_when_absent_or_empty() {
        for roadmap in [None, Some(Roadmap::default())] {
            let (surface, composed) = compose_recorded(&input(roadmap, LONG_FORM), Lang::En);
            assert!(composed.toc.iter().all(|e| e.title != EN.roadmap_title));
            assert!(!surface.all_texts().contains(&EN.vision));
            assert_eq!(composed.toc.last().unwrap().title, EN.conclusion_title);
        }
    }

    #[test]
    fn test_footer_on_every_page_except_cover() {
        let (surface, composed) = compose_recorded(&input(Some(roadmap()), LONG_FORM), Lang::En);
        let total = composed.page_count;

        let footer_count = |page: usize| {
            surface.pages[page]
                .iter()
                .filter(|m| matches!(m, Mark::Text { y, text, .. } if *y == FOOTER_BASELINE && text.starts_with("Page ")))
                .count()
        };

        assert_eq!(footer_count(0), 0);
        let mut footers = 0;
        for page in 1..total {
            assert_eq!(footer_count(page), 1, "page {page}");
            assert!(surface
                .texts(page)
                .contains(&page_label(&EN, page + 1, total).as_str()));
            footers += footer_count(page);
        }
        assert_eq!(footers, total - 1);
    }

    #[test]
    fn test_table_of_contents_lists_starting_pages() {
        let (surface, composed) = compose_recorded(&input(Some(roadmap()), LONG_FORM), Lang::En);
        let toc_texts = surface.texts(1);
        assert!(toc_texts.contains(&EN.contents));
        for entry in &composed.toc {
            assert!(toc_texts.contains(&entry.title.as_str()));
            assert!(toc_texts.contains(&entry.page.to_string().as_str()));
        }
    }

    #[test]
    fn test_portuguese_labels() {
        let (surface, composed) = compose_recorded(&input(Some(roadmap()), LONG_FORM), Lang::Pt);
        assert_eq!(composed.toc[0].title, PT.participant_title);
        assert!(surface.texts(1).contains(&"Sumário"));
        let expected = format!("Página 2 / {}", composed.page_count);
        assert!(surface.texts(1).contains(&expected.as_str()));
        assert!(surface.all_texts().contains(&"Dominância"));
        assert!(surface.texts(0).contains(&"14/03/2026"));
    }

    #[test]
    fn test_progress_bars_are_clamped() {
        let tests = TestResultSet::from_entries(vec![(
            TestKey::DiscInsight,
            TestResult {
                scores: vec![
                    ("D".to_string(), 150.0),
                    ("I".to_string(), -20.0),
                    ("S".to_string(), f64::NAN),
                    ("C".to_string(), 50.0),
                ],
                ..Default::default()
            },
        )]);
        let input = DocumentInput::new(profile(), tests, None, "Done.".to_string(), Utc::now());
        let (surface, _) = compose_recorded(&input, Lang::En);

        let fills: Vec<f32> = surface.pages[3]
            .iter()
            .filter_map(|m| match m {
                Mark::Rect { width, height, color } if *height == BAR_HEIGHT && *color == ACCENT => {
                    Some(*width)
                }
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert!((fills[0] - BAR_TRACK_WIDTH).abs() < 1e-3);
        assert!((fills[1] - BAR_TRACK_WIDTH / 2.0).abs() < 1e-3);

        let texts = surface.texts(3);
        assert!(texts.contains(&"100"));
        assert!(texts.contains(&"0"));
    }

    #[test]
    fn test_long_conclusion_paginates_within_margins() {
        let paragraph = "Your profile combines a strong drive for results with genuine \
                         curiosity about how people and systems work together. ";
        let long_form: String = (0..60)
            .map(|i| format!("## Theme {i}\n{}\n- point {i}\n\n", paragraph.repeat(3)))
            .collect();
        let (surface, composed) = compose_recorded(&input(None, &long_form), Lang::En);

        let conclusion_page = composed.toc.last().unwrap().page;
        assert!(composed.page_count > conclusion_page + 3);

        for page in &surface.pages {
            for mark in page {
                if let Mark::Text { y, .. } = mark {
                    if *y != FOOTER_BASELINE {
                        assert!(*y <= CONTENT_BOTTOM, "text baseline {y} below content area");
                    }
                }
            }
        }
        let texts = surface.all_texts();
        assert!(texts.contains(&"Theme 59"));
        assert!(texts.contains(&"point 59"));
    }

    #[test]
    fn test_headings_are_not_left_at_page_bottom() {
        let long_form: String = (0..80).map(|i| format!("## Heading {i}\nBody {i}\n")).collect();
        let (surface, _) = compose_recorded(&input(None, &long_form), Lang::En);

        for page in &surface.pages {
            let last_body = page.iter().rev().find_map(|m| match m {
                Mark::Text { y, weight, text, .. } if *y != FOOTER_BASELINE => Some((*weight, text)),
                _ => None,
            });
            if let Some((weight, text)) = last_body {
                assert!(
                    !(weight == FontWeight::Bold && text.starts_with("Heading")),
                    "page ends with heading {text}"
                );
            }
        }
    }

    #[test]
    fn test_missing_scores_and_profile_render_sentinels() {
        let tests = TestResultSet::from_entries(vec![(TestKey::Archetypes, TestResult::default())]);
        let input = DocumentInput::new(
            ParticipantProfile::default(),
            tests,
            None,
            "Done.".to_string(),
            Utc::now(),
        );
        let (surface, _) = compose_recorded(&input, Lang::En);
        let texts = surface.all_texts();
        assert!(texts.contains(&EN.no_scores));
        assert!(texts.contains(&EN.profile_unavailable));
    }

    #[test]
    fn test_archetypes_show_dominant() {
        let (surface, composed) = compose_recorded(&input(None, LONG_FORM), Lang::En);
        let page = composed
            .toc
            .iter()
            .find(|e| e.title == EN.archetypes_title)
            .unwrap()
            .page;
        let texts = surface.texts(page - 1);
        assert!(texts.contains(&EN.dominant_archetype));
        assert!(texts.contains(&"Sage"));
    }

    #[test]
    fn test_fit_text_truncates_with_ellipsis() {
        assert_eq!(fit_text("Short", &BODY, 200.0), "Short");
        let long = "Interpersonal and intrapersonal combined intelligence";
        let fitted = fit_text(long, &BODY, 80.0);
        assert!(fitted.ends_with('\u{2026}'));
        assert!(get_metrics(BODY.weight).width_pt(&fitted, BODY.size) <= 80.0 + 1e-3);
    }

    #[test]
    fn test_render_produces_well_formed_pdf() {
        let input = input(Some(roadmap()), LONG_FORM);
        let (_, composed) = compose_recorded(&input, Lang::Pt);

        let bytes = render(&input, Lang::Pt).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), composed.page_count);
    }
}
