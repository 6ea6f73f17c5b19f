//! The portfolio page: a column of sections, each with a glitch-text title
//! and a few typed lines that start when the section scrolls into view.

use neonfx_config::Config;
use neonfx_core::{NeonColor, Rgb, Timer, VisibilityTrigger};
use neonfx_effects::{
    CorruptibleText, GlitchPulses, Glyph, GlyphStyle, TypingEffect, TypingStyle, TypingView,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use rand::RngCore;

/// Columns left blank on either side of the content.
const MARGIN: u16 = 4;
/// Blank rows between sections.
const SECTION_GAP: u16 = 2;
const CURSOR: char = '▌';

const TEXT: Rgb = Rgb::new(224, 224, 224);
const PROMPT: Rgb = Rgb::new(57, 255, 20);
const GLITCH: Rgb = Rgb::new(255, 0, 110);
const SCRAMBLE: Rgb = Rgb::new(0, 255, 65);

/// When a line starts relative to its section becoming visible.
#[derive(Debug, Clone, Copy)]
enum Start {
    /// A fixed offset.
    At(u64),
    /// The line's index times the configured stagger.
    Staggered,
}

struct LineSpec {
    text: &'static str,
    style: TypingStyle,
    start: Start,
    /// Overrides the configured base delay.
    base_delay_ms: Option<u64>,
}

struct SectionSpec {
    title: &'static str,
    color: NeonColor,
    lines: &'static [LineSpec],
}

const fn line(text: &'static str, style: TypingStyle) -> LineSpec {
    LineSpec {
        text,
        style,
        start: Start::Staggered,
        base_delay_ms: None,
    }
}

const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        title: "NEON//FX",
        color: NeonColor::ElectricBlue,
        lines: &[
            LineSpec {
                text: "Hi, I'm",
                style: TypingStyle::Natural,
                start: Start::At(0),
                base_delay_ms: None,
            },
            LineSpec {
                text: "Full Stack Developer & Problem Solver",
                style: TypingStyle::Glitch,
                start: Start::At(1500),
                base_delay_ms: None,
            },
            LineSpec {
                text: "Turning ideas into scalable software solutions. \
                       Passionate about AI, Cybersecurity, and Smart Tech.",
                style: TypingStyle::Natural,
                start: Start::At(3000),
                base_delay_ms: None,
            },
        ],
    },
    SectionSpec {
        title: "ABOUT",
        color: NeonColor::Violet,
        lines: &[
            line("Systems programmer by day, tinkerer by night.", TypingStyle::Scramble),
            line("I like software that is fast, small and honest.", TypingStyle::Scramble),
        ],
    },
    SectionSpec {
        title: "PROJECTS",
        color: NeonColor::HotPink,
        lines: &[
            line("starfield: particles drifting across a terminal sky", TypingStyle::Natural),
            line("typewriter: five ways to reveal a sentence", TypingStyle::Natural),
            line("static: analog noise, corrupted text, glitch pulses", TypingStyle::Natural),
        ],
    },
    SectionSpec {
        title: "SKILLS",
        color: NeonColor::Aqua,
        lines: &[
            line("Rust  Go  TypeScript  Python  SQL", TypingStyle::Shuffled),
            line("Distributed systems  Security  Machine learning", TypingStyle::Shuffled),
        ],
    },
    SectionSpec {
        title: "CONTACT",
        color: NeonColor::Lime,
        lines: &[
            LineSpec {
                text: "echo hello@neonfx.dev",
                style: TypingStyle::Terminal,
                start: Start::Staggered,
                base_delay_ms: Some(30),
            },
            LineSpec {
                text: "ssh guest@neonfx.dev",
                style: TypingStyle::Terminal,
                start: Start::Staggered,
                base_delay_ms: Some(30),
            },
        ],
    },
];

/// One typed line and its pending launch.
#[derive(Debug)]
struct TypedLine {
    text: &'static str,
    base_delay_ms: u64,
    offset_ms: u64,
    /// The finished line, prompt and cursor included. Rows are laid out
    /// from this so they never change while the line types.
    finished: Vec<char>,
    effect: TypingEffect,
    launch: Timer,
}

impl TypedLine {
    /// Clear the line and start it again after its offset.
    fn schedule(&mut self, now_ms: u64) {
        self.effect.reset();
        self.launch.arm(now_ms, self.offset_ms);
    }

    fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        if let Some(due) = self.launch.fire(now_ms) {
            self.effect.start(self.text, self.base_delay_ms, due);
        }
        self.effect.tick(now_ms, rng);
    }

    /// Length of each row at `width` columns.
    fn row_lengths(&self, width: u16) -> Vec<usize> {
        wrap_lengths(&self.finished, usize::from(width))
    }

    fn rows(&self, width: u16) -> u16 {
        self.row_lengths(width).len() as u16
    }
}

#[derive(Debug)]
struct Section {
    title: CorruptibleText,
    color: NeonColor,
    lines: Vec<TypedLine>,
    trigger: VisibilityTrigger,
}

impl Section {
    fn height(&self, width: u16) -> u16 {
        // Title, a blank row, then the lines
        2 + self.lines.iter().map(|l| l.rows(width)).sum::<u16>()
    }
}

#[derive(Debug)]
pub struct Page {
    sections: Vec<Section>,
    scroll: u16,
    accent: Rgb,
    /// Where each title was last drawn, for hover hit-testing.
    title_areas: Vec<Option<Rect>>,
    hovered: Option<usize>,
}

impl Page {
    pub fn new(config: &Config) -> Self {
        let typing = &config.typing;

        let sections = SECTIONS
            .iter()
            .map(|def| Section {
                title: CorruptibleText::new(def.title, &config.glitch),
                color: def.color,
                lines: def
                    .lines
                    .iter()
                    .enumerate()
                    .map(|(i, l)| {
                        let effect = TypingEffect::new(l.style, typing);
                        let finished = effect
                            .prompt()
                            .unwrap_or_default()
                            .chars()
                            .chain(l.text.chars())
                            .chain([CURSOR])
                            .collect();
                        TypedLine {
                            text: l.text,
                            base_delay_ms: l.base_delay_ms.unwrap_or(typing.base_delay_ms),
                            offset_ms: match l.start {
                                Start::At(ms) => ms,
                                Start::Staggered => i as u64 * typing.stagger_ms,
                            },
                            finished,
                            effect,
                            launch: Timer::new(),
                        }
                    })
                    .collect(),
                trigger: VisibilityTrigger::new(),
            })
            .collect::<Vec<_>>();

        Self {
            title_areas: vec![None; sections.len()],
            sections,
            scroll: 0,
            accent: config.display.accent.rgb(),
            hovered: None,
        }
    }

    /// Number of glitch-text titles.
    pub fn title_count(&self) -> usize {
        self.sections.len()
    }

    fn content_width(viewport: Rect) -> u16 {
        viewport.width.saturating_sub(MARGIN * 2).max(1)
    }

    /// Top row of every section, in page coordinates, and the page height.
    fn layout(&self, width: u16) -> (Vec<u16>, u16) {
        let mut tops = Vec::with_capacity(self.sections.len());
        let mut y = 1;
        for section in &self.sections {
            tops.push(y);
            y += section.height(width) + SECTION_GAP;
        }
        (tops, y)
    }

    pub fn scroll_by(&mut self, delta: i32, viewport: Rect) {
        let (_, total) = self.layout(Self::content_width(viewport));
        let max = total.saturating_sub(viewport.height);
        let next = (self.scroll as i32 + delta).clamp(0, max as i32);
        self.scroll = next as u16;
    }

    /// Fire the visibility trigger of every section now on screen.
    pub fn observe(&mut self, viewport: Rect, now_ms: u64) {
        let width = Self::content_width(viewport);
        let (tops, _) = self.layout(width);
        let view = self.scroll..self.scroll.saturating_add(viewport.height);

        for (section, top) in self.sections.iter_mut().zip(tops) {
            let bottom = top + section.height(width);
            let visible = top < view.end && bottom > view.start;
            if section.trigger.observe(visible) {
                log::debug!("section {:?} in view", section.title.original());
                for line in &mut section.lines {
                    line.schedule(now_ms);
                }
            }
        }
    }

    /// Restart the typing of every section that has been seen.
    pub fn replay(&mut self, now_ms: u64) {
        for section in &mut self.sections {
            if section.trigger.has_fired() {
                for line in &mut section.lines {
                    line.schedule(now_ms);
                }
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        for section in &mut self.sections {
            section.title.tick(now_ms);
            for line in &mut section.lines {
                line.tick(now_ms, rng);
            }
        }
    }

    /// Corrupt a title and jitter it when the pointer moves onto it.
    pub fn hover(
        &mut self,
        col: u16,
        row: u16,
        now_ms: u64,
        pulses: &mut GlitchPulses,
        rng: &mut dyn RngCore,
    ) {
        let hit = self
            .title_areas
            .iter()
            .position(|a| a.is_some_and(|r| r.contains((col, row).into())));

        if hit != self.hovered {
            if let Some(i) = hit {
                self.sections[i].title.corrupt(now_ms, rng);
                pulses.hover(now_ms, i);
            }
            self.hovered = hit;
        }
    }

    pub fn render(
        &mut self,
        buf: &mut Buffer,
        viewport: Rect,
        now_ms: u64,
        pulses: &GlitchPulses,
        cell: (f32, f32),
    ) {
        let width = Self::content_width(viewport);
        let (tops, _) = self.layout(width);
        let left = viewport.x + MARGIN.min(viewport.width);
        self.title_areas.fill(None);

        for (i, (section, top)) in self.sections.iter().zip(tops).enumerate() {
            let title = section.title.text();
            let title_width = (title.chars().count() as u16).min(width);
            if let Some((rect, 0)) = place(viewport, left, title_width, top, 1, self.scroll) {
                let style = Style::new()
                    .fg(section.color.color())
                    .add_modifier(Modifier::BOLD);
                Line::styled(title, style).render(rect, buf);
                if let Some(pulse) = pulses.active_on(i, now_ms) {
                    pulse.apply(buf, rect, now_ms, cell);
                }
                self.title_areas[i] = Some(rect);
            }

            let mut y = top + 2;
            for line in &section.lines {
                let lengths = line.row_lengths(width);
                let rows = lengths.len() as u16;
                if let Some((rect, skip)) = place(viewport, left, width, y, rows, self.scroll) {
                    let view = line.effect.view(now_ms);
                    Paragraph::new(view_lines(&view, self.accent, &lengths))
                        .scroll((skip, 0))
                        .render(rect, buf);
                }
                y += rows;
            }
        }
    }
}

/// Screen rect of a block at page row `top`, clipped to the viewport, and
/// how many of its rows are scrolled off the top.
fn place(
    viewport: Rect,
    left: u16,
    width: u16,
    top: u16,
    rows: u16,
    scroll: u16,
) -> Option<(Rect, u16)> {
    let bottom = top + rows;
    let view_end = scroll.saturating_add(viewport.height);
    if bottom <= scroll || top >= view_end || width == 0 {
        return None;
    }
    let skip = scroll.saturating_sub(top);
    let first = top.max(scroll);
    let last = bottom.min(view_end);
    let rect = Rect::new(left, viewport.y + (first - scroll), width, last - first);
    Some((rect, skip))
}

fn glyph_color(style: GlyphStyle, accent: Rgb) -> Rgb {
    match style {
        GlyphStyle::Plain | GlyphStyle::Hidden => TEXT,
        GlyphStyle::Prompt => PROMPT,
        GlyphStyle::Accent => accent,
        GlyphStyle::Glitch => GLITCH,
        GlyphStyle::Scramble => SCRAMBLE,
    }
}

/// Row lengths of `text` laid out `width` columns wide.
///
/// Rows break before the word that would overflow; a word longer than a row
/// is split. Spaces at a break stay on the row they follow, where they are
/// clipped if they spill past the edge.
fn wrap_lengths(text: &[char], width: usize) -> Vec<usize> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    while text.len() - start > width {
        let edge = start + width;
        let end = if text[edge] == ' ' {
            text[edge..]
                .iter()
                .position(|&ch| ch != ' ')
                .map_or(text.len(), |n| edge + n)
        } else {
            (start + 1..=edge)
                .rev()
                .find(|&i| text[i - 1] == ' ' && text[i] != ' ')
                .unwrap_or(edge)
        };
        rows.push(end - start);
        start = end;
    }
    if start < text.len() || rows.is_empty() {
        rows.push(text.len() - start);
    }
    rows
}

/// Render a typing view as rows of the given lengths, merging runs of
/// equally coloured glyphs. Whatever is left over goes on the last row.
fn view_lines(view: &TypingView, accent: Rgb, lengths: &[usize]) -> Vec<Line<'static>> {
    let mut cells: Vec<(char, Rgb)> = view
        .glyphs
        .iter()
        .map(|&Glyph { ch, style }| {
            let ch = if style == GlyphStyle::Hidden { ' ' } else { ch };
            (ch, glyph_color(style, accent))
        })
        .collect();
    if view.cursor {
        cells.push((CURSOR, accent));
    }

    let mut lines = Vec::with_capacity(lengths.len());
    let mut rest = cells.as_slice();
    for (i, &len) in lengths.iter().enumerate() {
        if rest.is_empty() {
            break;
        }
        let take = if i + 1 == lengths.len() {
            rest.len()
        } else {
            len.min(rest.len())
        };
        let (row, tail) = rest.split_at(take);
        lines.push(merge_runs(row));
        rest = tail;
    }
    lines
}

fn merge_runs(cells: &[(char, Rgb)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = cells
        .chunk_by(|a, b| a.1 == b.1)
        .map(|run| {
            let text: String = run.iter().map(|&(ch, _)| ch).collect();
            Span::styled(text, Style::new().fg(run[0].1.into()))
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonfx_effects::GlitchKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn viewport() -> Rect {
        Rect::new(0, 0, 80, 12)
    }

    #[test]
    fn test_hero_starts_when_first_observed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut page = Page::new(&Config::default());
        page.tick(5000, &mut rng);
        assert!(page.sections[0].lines.iter().all(|l| !l.effect.is_running()));

        page.observe(viewport(), 0);
        page.tick(0, &mut rng);
        let hero = &page.sections[0].lines;
        assert!(hero[0].effect.is_running());
        assert!(!hero[1].effect.is_running());

        page.tick(1500, &mut rng);
        assert!(page.sections[0].lines[1].effect.is_running());
    }

    #[test]
    fn test_offscreen_sections_wait_for_scroll() {
        let mut page = Page::new(&Config::default());
        page.observe(viewport(), 0);
        let last = page.sections.len() - 1;
        assert!(!page.sections[last].trigger.has_fired());

        page.scroll_by(1000, viewport());
        page.observe(viewport(), 100);
        assert!(page.sections[last].trigger.has_fired());
    }

    #[test]
    fn test_staggered_lines() {
        let config = Config::default();
        let page = Page::new(&config);
        let projects = &page.sections[2].lines;
        let offsets: Vec<u64> = projects.iter().map(|l| l.offset_ms).collect();
        assert_eq!(offsets, vec![0, config.typing.stagger_ms, 2 * config.typing.stagger_ms]);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = Page::new(&Config::default());
        page.scroll_by(-5, viewport());
        assert_eq!(page.scroll, 0);
        page.scroll_by(10_000, viewport());
        let (_, total) = page.layout(Page::content_width(viewport()));
        assert_eq!(page.scroll, total - viewport().height);
    }

    #[test]
    fn test_place_clips_to_viewport() {
        let vp = Rect::new(0, 0, 80, 10);
        assert_eq!(place(vp, 4, 20, 2, 3, 0), Some((Rect::new(4, 2, 20, 3), 0)));
        assert_eq!(place(vp, 4, 20, 2, 3, 3), Some((Rect::new(4, 0, 20, 2), 1)));
        assert_eq!(place(vp, 4, 20, 2, 3, 5), None);
        assert_eq!(place(vp, 4, 20, 12, 1, 0), None);
    }

    #[test]
    fn test_hover_corrupts_title_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = Config::default();
        config.glitch.corruption_chance = 1.0;
        let mut page = Page::new(&config);

        let area = viewport();
        let mut buf = Buffer::empty(area);
        let mut pulses = GlitchPulses::new(&config.glitch, page.title_count());
        page.render(&mut buf, area, 0, &pulses, (8.0, 16.0));

        let title = page.title_areas[0].unwrap();
        page.hover(title.x, title.y, 0, &mut pulses, &mut rng);
        assert!(page.sections[0].title.is_corrupted());

        page.tick(config.glitch.corruption_ms, &mut rng);
        assert!(!page.sections[0].title.is_corrupted());

        // Still hovering: no new corruption
        page.hover(title.x + 1, title.y, 300, &mut pulses, &mut rng);
        assert!(!page.sections[0].title.is_corrupted());
    }

    #[test]
    fn test_hover_plays_intense_glitch() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = Config::default();
        let mut page = Page::new(&config);
        let mut pulses = GlitchPulses::new(&config.glitch, page.title_count());

        let area = viewport();
        let mut buf = Buffer::empty(area);
        page.render(&mut buf, area, 0, &pulses, (8.0, 16.0));
        let title = page.title_areas[0].unwrap();

        page.hover(title.x, title.y, 50, &mut pulses, &mut rng);
        let pulse = pulses.active_on(0, 50).expect("hover glitch");
        assert_eq!(pulse.kind, GlitchKind::Intense);
        assert_eq!(pulse.duration_ms, config.glitch.hover_ms);

        // Leaving and coming back plays it again
        page.hover(0, area.bottom() - 1, 400, &mut pulses, &mut rng);
        page.hover(title.x, title.y, 500, &mut pulses, &mut rng);
        assert_eq!(pulses.active_on(0, 500).map(|p| p.started_ms), Some(500));
    }

    #[test]
    fn test_wrap_breaks_at_words() {
        let text: Vec<char> = "ab cd ef".chars().collect();
        assert_eq!(wrap_lengths(&text, 5), vec![6, 2]);
        assert_eq!(wrap_lengths(&text, 4), vec![3, 3, 2]);
        assert_eq!(wrap_lengths(&text, 80), vec![8]);

        let long: Vec<char> = "abcdefgh ij".chars().collect();
        assert_eq!(wrap_lengths(&long, 3), vec![3, 3, 3, 2]);
        assert_eq!(wrap_lengths(&[], 10), vec![0]);
    }

    #[test]
    fn test_narrow_viewport_shows_whole_tagline() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = Config::default();
        let mut page = Page::new(&config);
        let area = Rect::new(0, 0, 28, 40);

        page.observe(area, 0);
        page.tick(0, &mut rng);
        page.tick(120_000, &mut rng);
        let tagline = &page.sections[0].lines[2];
        assert!(tagline.effect.is_complete());

        let mut buf = Buffer::empty(area);
        let pulses = GlitchPulses::new(&config.glitch, page.title_count());
        page.render(&mut buf, area, 120_000, &pulses, (8.0, 16.0));

        let rows: Vec<String> = (area.top()..area.bottom())
            .map(|y| (area.left()..area.right()).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        let all = rows.join("\n");
        assert!(all.contains("Turning ideas into"), "{all}");
        assert!(all.contains("Smart Tech."), "{all}");
    }

    #[test]
    fn test_view_lines_merge_runs() {
        let view = TypingView {
            glyphs: vec![
                Glyph::new('$', GlyphStyle::Prompt),
                Glyph::new(' ', GlyphStyle::Prompt),
                Glyph::new('l', GlyphStyle::Plain),
                Glyph::new('s', GlyphStyle::Plain),
            ],
            cursor: true,
        };
        let lines = view_lines(&view, NeonColor::ElectricBlue.rgb(), &[5]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[0].content, "$ ");
        assert_eq!(lines[0].spans[1].content, "ls");
    }

    #[test]
    fn test_view_lines_follow_row_lengths() {
        let view = TypingView {
            glyphs: "ab cd".chars().map(|ch| Glyph::new(ch, GlyphStyle::Plain)).collect(),
            cursor: true,
        };
        let lines = view_lines(&view, NeonColor::ElectricBlue.rgb(), &[3, 3]);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["ab ".to_string(), format!("cd{CURSOR}")]);

        // Partially typed: trailing rows stay empty
        let short = TypingView {
            glyphs: vec![Glyph::new('a', GlyphStyle::Plain)],
            cursor: false,
        };
        assert_eq!(view_lines(&short, Rgb::WHITE, &[3, 3]).len(), 1);
    }
}
