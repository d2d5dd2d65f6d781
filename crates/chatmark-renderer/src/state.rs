//! Context tracked while walking markdown events.

use pulldown_cmark::Alignment;

/// Code block being collected.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Finish the block and return `(language, content)`.
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Table being rendered.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    /// `style` attribute for the current cell, including the leading space.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Image whose alt text is being collected.
#[derive(Default)]
pub(crate) struct ImageState {
    pending: Option<(String, String)>,
    alt_text: String,
}

impl ImageState {
    /// Start collecting alt text for an image with `src` and `title`.
    pub fn start(&mut self, src: String, title: String) {
        self.pending = Some((src, title));
        self.alt_text.clear();
    }

    /// Finish the image and return `(src, title, alt)`.
    pub fn end(&mut self) -> Option<(String, String, String)> {
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("rust".to_owned()));
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let (lang, content) = state.end();
        assert_eq!(lang.as_deref(), Some("rust"));
        assert_eq!(content, "fn main() {}");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);

        state.start_head();
        assert_eq!(state.cell_tag(), "th");
        assert_eq!(state.current_alignment_style(), r#" style="text-align:left""#);
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.end_head();

        state.start_row();
        assert_eq!(state.cell_tag(), "td");
        state.next_cell();
        state.next_cell();
        assert_eq!(state.current_alignment_style(), r#" style="text-align:right""#);
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        assert!(state.end().is_none());

        state.start("a.png".to_owned(), String::new());
        assert!(state.is_active());
        state.push_str("alt ");
        state.push_str("text");
        assert_eq!(
            state.end(),
            Some(("a.png".to_owned(), String::new(), "alt text".to_owned()))
        );
        assert!(!state.is_active());
    }
}
