//! Paragraph markup – the small markup language the layout engine reads.
//!
//! Stripped text is split into paragraphs, each paragraph is escaped so that
//! `&`, `<` and `>` stay literal, and hard line breaks become `<br/>`
//! directives. [`parse_markup`] is the engine side: it recognises `<br/>`
//! and the three entities and nothing else.

/// Line-break directive emitted between the hard lines of a paragraph.
pub const LINE_BREAK: &str = "<br/>";

/// Split stripped text on blank-line separators, trimming each segment and
/// dropping empty or whitespace-only ones.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape the characters the markup reader treats specially.
///
/// Ampersands are replaced first so entities produced for `<` and `>` are
/// not escaped a second time.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the engine markup for one paragraph.
pub fn paragraph_markup(paragraph: &str) -> String {
    escape_markup(paragraph).replace('\n', LINE_BREAK)
}

/// Convert stripped text into one markup string per paragraph block.
pub fn build_paragraphs(text: &str) -> Vec<String> {
    split_paragraphs(text)
        .iter()
        .map(|p| paragraph_markup(p))
        .collect()
}

/// Read paragraph markup back into its hard lines of literal text.
///
/// `<br/>`, `<br />` and `<br>` all break the line. Any other `<` is kept
/// literally, as is an `&` that does not start a known entity.
pub fn parse_markup(markup: &str) -> Vec<String> {
    let mut reader = Reader::new(markup);
    reader.read_lines()
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn read_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        while !self.eof() {
            if let Some(len) = self.line_break_len() {
                lines.push(std::mem::take(&mut current));
                self.pos += len;
            } else if let Some((ch, len)) = self.entity() {
                current.push(ch);
                self.pos += len;
            } else {
                let c = self.current_char();
                current.push(c);
                self.pos += c.len_utf8();
            }
        }
        lines.push(current);
        lines
    }

    /// Byte length of a line-break tag at the cursor, if there is one.
    fn line_break_len(&self) -> Option<usize> {
        ["<br/>", "<br />", "<br>"]
            .iter()
            .find(|tag| self.starts_with(tag))
            .map(|tag| tag.len())
    }

    fn entity(&self) -> Option<(char, usize)> {
        [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')]
            .iter()
            .find(|(name, _)| self.starts_with(name))
            .map(|(name, ch)| (*ch, name.len()))
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }
}
