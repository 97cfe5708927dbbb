// SPDX-License-Identifier: MIT
//
// Shell — the state behind the palette screen.
//
// Owns everything that changes while the tool runs (the base-color field,
// the generated palette, the vision mode, the copy indicator and the
// focused swatch) and turns user actions into calls on the color core plus
// the four collaborators:
//
//   Clipboard  → receives hex codes and CSS text
//   Notifier   → receives toasts (success and error outcomes)
//   Download   → receives the PNG data URI and a file name
//   Rasterizer → paints the swatch grid into a bitmap
//
// Operations never fail outward. Every problem becomes an error toast and
// the previous palette stays on screen.

use std::io;
use std::time::{Duration, Instant};

use n_color::{Color, ColorError, Palette, SimulationMode, generate, simulate, to_css_block};
use n_export::{Download, GridRasterizer, PaletteRegion, RasterOptions, Rasterizer};

use crate::field::TextField;
use crate::toast::{DEFAULT_DURATION, Notifier, Toast};

/// Number of swatches in a palette.
const SWATCHES: usize = 4;

// ─── Collaborators ───────────────────────────────────────────────────────────

/// Destination for copied text.
///
/// Writes are best-effort: the shell logs a failure and carries on.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

// ─── Timings ─────────────────────────────────────────────────────────────────

/// How long transient feedback stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub toast: Duration,
    /// Lifetime of the "Copied!" label.
    pub copied: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            toast: DEFAULT_DURATION,
            copied: Duration::from_millis(2000),
        }
    }
}

// ─── Swatch view model ───────────────────────────────────────────────────────

/// One palette entry as it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// The generated color; this is what the label shows and what gets copied.
    pub original: Color,
    /// `original` under the current vision mode; this is the fill.
    pub displayed: Color,
    /// Label ink: dark on light swatches, light otherwise.
    pub dark_label: bool,
    pub copied: bool,
    pub focused: bool,
}

// ─── Shell ───────────────────────────────────────────────────────────────────

pub struct Shell<C, N, D, R = GridRasterizer> {
    input: TextField,
    palette: Option<Palette>,
    mode: SimulationMode,

    /// Slot of the last copy and when it happened.
    copied: Option<(usize, Instant)>,

    /// Focused swatch index (0..4).
    selected: usize,
    timings: Timings,

    clipboard: C,
    notifier: N,
    download: D,
    rasterizer: R,
}

impl<C: Clipboard, N: Notifier, D: Download> Shell<C, N, D> {
    /// A shell with `base` in the input field and no palette yet.
    pub fn new(base: &str, timings: Timings, clipboard: C, notifier: N, download: D) -> Self {
        Self {
            input: TextField::new(base),
            palette: None,
            mode: SimulationMode::Normal,
            copied: None,
            selected: 0,
            timings,
            clipboard,
            notifier,
            download,
            rasterizer: GridRasterizer,
        }
    }
}

impl<C: Clipboard, N: Notifier, D: Download, R: Rasterizer> Shell<C, N, D, R> {
    /// Swap the image rasterizer.
    pub fn with_rasterizer<R2: Rasterizer>(self, rasterizer: R2) -> Shell<C, N, D, R2> {
        Shell {
            input: self.input,
            palette: self.palette,
            mode: self.mode,
            copied: self.copied,
            selected: self.selected,
            timings: self.timings,
            clipboard: self.clipboard,
            notifier: self.notifier,
            download: self.download,
            rasterizer,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub const fn input(&self) -> &TextField {
        &self.input
    }

    pub const fn input_mut(&mut self) -> &mut TextField {
        &mut self.input
    }

    pub const fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub const fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Actions ─────────────────────────────────────────────────

    /// Parse the input and replace the palette.
    ///
    /// Invalid input leaves the current palette in place.
    pub fn generate(&mut self) {
        match Color::parse(self.input.text()) {
            Ok(base) => {
                let palette = generate(base);
                tracing::debug!(base = %base, colors = ?palette.colors(), "palette generated");
                self.palette = Some(palette);
                self.copied = None;
            }
            Err(ColorError::InvalidColorFormat { input }) => {
                tracing::debug!(input = %input, "rejected base color");
                self.toast(Toast::error(
                    "Invalid color",
                    format!("{:?} is not # followed by six hex digits", input.trim()),
                ));
            }
            Err(err) => self.toast(Toast::error("Invalid color", err.to_string())),
        }
    }

    /// Copy the focused swatch's generated hex (never the simulated one).
    pub fn copy_selected(&mut self, now: Instant) {
        let Some(color) = self.palette.as_ref().and_then(|p| p.get(self.selected).copied()) else {
            self.empty_palette_toast();
            return;
        };
        self.write_clipboard(&color.to_hex());
        self.copied = Some((self.selected, now));
    }

    /// Advance to the next vision mode, wrapping back to normal.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        tracing::debug!(mode = %self.mode, "vision mode");
    }

    /// Put the palette on the clipboard as CSS custom properties.
    pub fn copy_css(&mut self) {
        let colors = self.palette.as_ref().map_or(&[][..], |p| &p[..]);
        match to_css_block(colors) {
            Ok(css) => {
                self.write_clipboard(&css);
                self.toast(Toast::success(
                    "CSS Variables Copied",
                    "Variables copied to clipboard successfully",
                ));
            }
            Err(ColorError::EmptyPalette) => self.empty_palette_toast(),
            Err(err) => self.toast(Toast::error("Copy failed", err.to_string())),
        }
    }

    /// Save the swatch grid, as currently previewed, to `color-palette.png`.
    pub fn export_png(&mut self) {
        if self.palette.is_none() {
            self.empty_palette_toast();
            return;
        }
        let shown = self.swatches().iter().map(|s| s.displayed).collect();
        let region = PaletteRegion::new(shown).with_focus(self.selected);

        match n_export::export_png(
            &self.rasterizer,
            &region,
            &RasterOptions::default(),
            &mut self.download,
        ) {
            Ok(path) => {
                let toast = Toast::success("Palette Image Saved", path.display().to_string());
                self.toast(toast);
            }
            Err(err) => {
                tracing::warn!(error = %err, "palette image export failed");
                self.toast(Toast::error("Image export failed", err.to_string()));
            }
        }
    }

    pub const fn focus_next(&mut self) {
        self.selected = (self.selected + 1) % SWATCHES;
    }

    pub const fn focus_prev(&mut self) {
        self.selected = (self.selected + SWATCHES - 1) % SWATCHES;
    }

    /// Expire the copy indicator and toasts. Returns `true` if the screen
    /// needs a repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .copied
            .is_some_and(|(_, at)| now.saturating_duration_since(at) >= self.timings.copied);
        if expired {
            self.copied = None;
        }
        self.notifier.expire(now) || expired
    }

    // ── View model ──────────────────────────────────────────────

    /// Palette entries ready to draw, in slot order. Empty before the
    /// first successful generate.
    pub fn swatches(&self) -> Vec<Swatch> {
        let Some(palette) = &self.palette else {
            return Vec::new();
        };
        let copied = self.copied.map(|(slot, _)| slot);
        palette
            .iter()
            .enumerate()
            .map(|(i, &original)| Swatch {
                original,
                displayed: simulate(original, self.mode),
                dark_label: original.wants_dark_label(),
                copied: copied == Some(i),
                focused: i == self.selected,
            })
            .collect()
    }

    // ── Internals ───────────────────────────────────────────────

    fn write_clipboard(&mut self, text: &str) {
        if let Err(err) = self.clipboard.write_text(text) {
            tracing::warn!(error = %err, "clipboard write failed");
        }
    }

    fn empty_palette_toast(&mut self) {
        self.toast(Toast::error(
            "No colors generated",
            "Please generate a color palette first",
        ));
    }

    fn toast(&mut self, toast: Toast) {
        self.notifier.notify(toast.with_duration(self.timings.toast));
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastKind;
    use n_export::{ExportError, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::path::PathBuf;

    // ── Recording collaborators ─────────────────────────────────

    #[derive(Default)]
    struct RecClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl Clipboard for RecClipboard {
        fn write_text(&mut self, text: &str) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("no clipboard"));
            }
            self.writes.push(text.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecNotifier(Vec<Toast>);

    impl Notifier for RecNotifier {
        fn notify(&mut self, toast: Toast) {
            self.0.push(toast);
        }
    }

    #[derive(Default)]
    struct RecDownload {
        saved: Vec<(String, String)>,
        fail: bool,
    }

    impl Download for RecDownload {
        fn save(&mut self, data_uri: &str, filename: &str) -> Result<PathBuf, ExportError> {
            if self.fail {
                return Err(ExportError::InvalidFilename(filename.to_owned()));
            }
            self.saved.push((data_uri.to_owned(), filename.to_owned()));
            Ok(PathBuf::from("/out").join(filename))
        }
    }

    /// Counts calls and records what it was asked to paint.
    #[derive(Default)]
    struct SpyRasterizer {
        calls: Cell<usize>,
        last: std::cell::RefCell<Option<(PaletteRegion, RasterOptions)>>,
    }

    impl Rasterizer for &SpyRasterizer {
        fn rasterize(&self, region: &PaletteRegion, options: &RasterOptions) -> RgbaImage {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some((region.clone(), *options));
            RgbaImage::new(options.width, options.height)
        }
    }

    type TestShell = Shell<RecClipboard, RecNotifier, RecDownload>;

    fn shell(base: &str) -> TestShell {
        Shell::new(
            base,
            Timings::default(),
            RecClipboard::default(),
            RecNotifier::default(),
            RecDownload::default(),
        )
    }

    fn generated(base: &str) -> TestShell {
        let mut s = shell(base);
        s.generate();
        s
    }

    fn hex(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    fn titles(s: &TestShell) -> Vec<(ToastKind, &str)> {
        s.notifier.0.iter().map(|t| (t.kind, t.title.as_str())).collect()
    }

    // ── Generate ────────────────────────────────────────────────

    #[test]
    fn starts_empty_in_normal_mode() {
        let s = shell("#3498db");
        assert!(s.palette().is_none());
        assert!(s.swatches().is_empty());
        assert_eq!(s.mode(), SimulationMode::Normal);
        assert_eq!(s.input().text(), "#3498db");
    }

    #[test]
    fn generate_replaces_palette() {
        let mut s = generated("#3498db");
        let hexes: Vec<String> = s.palette().unwrap().iter().map(|c| c.to_hex()).collect();
        assert_eq!(hexes, ["#3498db", "#67cc0e", "#0165a8", "#cb6724"]);

        for _ in 0..7 {
            s.input_mut().backspace();
        }
        s.input_mut().insert_str("#FFFFFF");
        s.generate();
        assert_eq!(s.palette().unwrap()[1], hex("#333332"));
        assert!(s.notifier.0.is_empty());
    }

    #[test]
    fn invalid_input_keeps_prior_palette() {
        let mut s = generated("#3498db");
        s.input_mut().backspace();
        s.generate();

        assert_eq!(s.palette().unwrap().base(), hex("#3498db"));
        assert_eq!(titles(&s), [(ToastKind::Error, "Invalid color")]);
        assert!(s.notifier.0[0].description.contains("\"#3498d\""));
    }

    #[test]
    fn invalid_input_without_palette_stays_empty() {
        let mut s = generated("blue");
        assert!(s.palette().is_none());
        assert_eq!(titles(&s), [(ToastKind::Error, "Invalid color")]);
    }

    // ── Copy hex ────────────────────────────────────────────────

    #[test]
    fn copy_writes_unsimulated_hex() {
        let mut s = generated("#3498db");
        s.cycle_mode();
        s.focus_next();
        s.copy_selected(Instant::now());

        assert_eq!(s.clipboard.writes, ["#67cc0e"]);
        let sw = s.swatches();
        assert!(sw[1].copied);
        assert!(!sw[0].copied);
    }

    #[test]
    fn copied_label_marks_one_slot_of_repeated_colors() {
        let mut s = generated("#666666");
        let colors: Vec<String> = s.swatches().iter().map(|w| w.original.to_hex()).collect();
        assert_eq!(colors, ["#666666", "#999999", "#333333", "#999999"]);

        s.focus_next();
        s.copy_selected(Instant::now());

        let flags: Vec<bool> = s.swatches().iter().map(|w| w.copied).collect();
        assert_eq!(flags, [false, true, false, false]);
    }

    #[test]
    fn regenerate_clears_copied_label() {
        let mut s = generated("#3498db");
        s.copy_selected(Instant::now());
        s.generate();
        assert!(s.swatches().iter().all(|w| !w.copied));
    }

    #[test]
    fn copied_label_clears_after_two_seconds() {
        let t0 = Instant::now();
        let mut s = generated("#3498db");
        s.copy_selected(t0);

        assert!(!s.tick(t0 + Duration::from_millis(1999)));
        assert!(s.swatches()[0].copied);
        assert!(s.tick(t0 + Duration::from_millis(2000)));
        assert!(!s.swatches()[0].copied);
    }

    #[test]
    fn copy_without_palette_toasts() {
        let mut s = shell("#3498db");
        s.copy_selected(Instant::now());
        assert!(s.clipboard.writes.is_empty());
        assert_eq!(titles(&s), [(ToastKind::Error, "No colors generated")]);
    }

    #[test]
    fn clipboard_failure_is_not_surfaced() {
        let mut s = generated("#3498db");
        s.clipboard.fail = true;
        s.copy_selected(Instant::now());
        assert!(s.notifier.0.is_empty());
        assert!(s.swatches()[0].copied);
    }

    // ── Vision mode ─────────────────────────────────────────────

    #[test]
    fn mode_cycles_through_all_four() {
        let mut s = shell("#3498db");
        let mut seen = vec![s.mode()];
        for _ in 0..4 {
            s.cycle_mode();
            seen.push(s.mode());
        }
        assert_eq!(
            seen,
            [
                SimulationMode::Normal,
                SimulationMode::Protanopia,
                SimulationMode::Deuteranopia,
                SimulationMode::Tritanopia,
                SimulationMode::Normal,
            ]
        );
    }

    #[test]
    fn swatches_fill_with_simulated_color() {
        let mut s = generated("#3498db");
        s.cycle_mode();
        let sw = s.swatches();
        assert_eq!(sw[0].original, hex("#3498db"));
        assert_eq!(sw[0].displayed, hex("#5f60b3"));
        for w in &sw {
            assert_eq!(w.displayed, simulate(w.original, SimulationMode::Protanopia));
        }
    }

    #[test]
    fn label_ink_follows_original_value() {
        let s = generated("#3498db");
        let ink: Vec<bool> = s.swatches().iter().map(|w| w.dark_label).collect();
        // #3498db, #67cc0e, #0165a8 sit below the midpoint; #cb6724 above.
        assert_eq!(ink, [false, false, false, true]);
    }

    // ── Focus ───────────────────────────────────────────────────

    #[test]
    fn focus_wraps_both_ways() {
        let mut s = generated("#3498db");
        s.focus_prev();
        assert_eq!(s.selected(), 3);
        s.focus_next();
        assert_eq!(s.selected(), 0);
        assert!(s.swatches()[0].focused);
    }

    // ── CSS ─────────────────────────────────────────────────────

    #[test]
    fn copy_css_without_palette() {
        let mut s = shell("#3498db");
        s.copy_css();
        assert!(s.clipboard.writes.is_empty());
        let t = &s.notifier.0[0];
        assert_eq!(t.kind, ToastKind::Error);
        assert_eq!(t.title, "No colors generated");
        assert_eq!(t.description, "Please generate a color palette first");
        assert_eq!(t.duration, Duration::from_millis(2000));
    }

    #[test]
    fn copy_css_writes_block_and_toasts() {
        let mut s = generated("#3498db");
        s.cycle_mode();
        s.copy_css();

        assert_eq!(
            s.clipboard.writes[0],
            ":root {\n  --color-1: #3498db;\n  --color-2: #67cc0e;\n  --color-3: #0165a8;\n  --color-4: #cb6724;\n}"
        );
        let t = &s.notifier.0[0];
        assert_eq!(t.kind, ToastKind::Success);
        assert_eq!(t.title, "CSS Variables Copied");
        assert_eq!(t.description, "Variables copied to clipboard successfully");
    }

    #[test]
    fn toast_duration_follows_timings() {
        let mut s = Shell::new(
            "#000000",
            Timings {
                toast: Duration::from_millis(750),
                ..Timings::default()
            },
            RecClipboard::default(),
            RecNotifier::default(),
            RecDownload::default(),
        );
        s.copy_css();
        assert_eq!(s.notifier.0[0].duration, Duration::from_millis(750));
    }

    // ── PNG export ──────────────────────────────────────────────

    #[test]
    fn export_without_palette_toasts() {
        let mut s = shell("#3498db");
        s.export_png();
        assert!(s.download.saved.is_empty());
        assert_eq!(titles(&s), [(ToastKind::Error, "No colors generated")]);
    }

    #[test]
    fn export_saves_png_uri() {
        let mut s = generated("#3498db");
        s.export_png();

        let (uri, name) = &s.download.saved[0];
        assert_eq!(name, "color-palette.png");
        assert!(uri.starts_with("data:image/png;base64,"));
        let t = &s.notifier.0[0];
        assert_eq!(t.kind, ToastKind::Success);
        assert_eq!(t.description, "/out/color-palette.png");
    }

    #[test]
    fn export_rasterizes_simulated_swatches_without_overlays() {
        let spy = SpyRasterizer::default();
        let mut s = generated("#3498db").with_rasterizer(&spy);
        s.cycle_mode();
        s.cycle_mode();
        s.export_png();

        assert_eq!(spy.calls.get(), 1);
        let (region, options) = spy.last.borrow().clone().unwrap();
        let expected: Vec<Color> = s
            .palette()
            .unwrap()
            .iter()
            .map(|&c| simulate(c, SimulationMode::Deuteranopia))
            .collect();
        assert_eq!(region.swatches, expected);
        assert_eq!((options.width, options.height), (400, 400));
        assert_eq!(options.background, None);
        assert!(options.hide_overlays);
    }

    #[test]
    fn export_failure_toasts_error() {
        let mut s = generated("#3498db");
        s.download.fail = true;
        s.export_png();
        assert_eq!(titles(&s), [(ToastKind::Error, "Image export failed")]);
        assert!(s.palette().is_some());
    }
}
