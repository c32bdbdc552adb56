//! Text repair for the switch dialect.
//!
//! Responses look like JSON but use bare keys, bare hex literals, single or
//! backtick quotes and empty value holes (`{vnd:,pnr:}`). [`repair`] rewrites
//! them into strict JSON where every scalar is a double-quoted string, so the
//! parser never has to guess at number syntax. Structure is copied as-is;
//! anything the scanner cannot make sense of is left for the strict parser to
//! reject.

/// Rewrite device text into strict JSON.
///
/// Idempotent: repairing already repaired text returns it unchanged.
pub fn repair(text: &str) -> String {
    let mut scanner = Scanner::new(text);
    scanner.run();
    scanner.out
}

struct Scanner<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    out: String,
    /// Open brackets and braces, innermost last.
    open: Vec<u8>,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            out: String::with_capacity(source.len() + source.len() / 2),
            open: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn run(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'"' | b'\'' | b'`' => self.quoted(b),
                b'{' | b'[' => {
                    self.out.push(char::from(b));
                    self.pos += 1;
                    self.open.push(b);
                    self.fill_array_hole();
                }
                b'}' | b']' => {
                    self.out.push(char::from(b));
                    self.pos += 1;
                    self.open.pop();
                }
                b',' => {
                    self.out.push(',');
                    self.pos += 1;
                    self.fill_array_hole();
                }
                b':' => {
                    self.out.push(':');
                    self.pos += 1;
                    if self.at_value_end() {
                        self.out.push_str("\"\"");
                    }
                }
                _ if b.is_ascii_whitespace() => self.pos += 1,
                _ => self.bare(),
            }
        }
    }

    fn next_significant(&self) -> Option<u8> {
        self.bytes[self.pos..]
            .iter()
            .copied()
            .find(|b| !b.is_ascii_whitespace())
    }

    /// True when the next significant byte closes the current value, i.e.
    /// the device left the value out entirely.
    fn at_value_end(&self) -> bool {
        matches!(self.next_significant(), None | Some(b',' | b'}' | b']'))
    }

    /// An array slot left empty (`[0x1,,0x2]`, `[,0x1]`) becomes `""`.
    /// Only a following comma marks a hole: `[]` stays empty and a trailing
    /// comma is left for the parser.
    fn fill_array_hole(&mut self) {
        if self.open.last() == Some(&b'[') && self.next_significant() == Some(b',') {
            self.out.push_str("\"\"");
        }
    }

    /// Bare token: a key before `:` or an unquoted value. Both become
    /// double-quoted strings.
    fn bare(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(|b| !is_delimiter(b)) {
            self.pos += 1;
        }
        self.out.push('"');
        for ch in self.source[start..self.pos].chars() {
            push_escaped(&mut self.out, ch);
        }
        self.out.push('"');
    }

    /// Quoted string in any of the three quote styles, re-emitted with
    /// double quotes. Backslash escapes are copied through. An unterminated
    /// string is left unterminated so strict parsing fails on it.
    fn quoted(&mut self, quote: u8) {
        self.pos += 1;
        self.out.push('"');
        let mut start = self.pos;
        while let Some(b) = self.peek() {
            if b == quote {
                self.flush(start, quote);
                self.out.push('"');
                self.pos += 1;
                return;
            }
            if b == b'\\' {
                self.flush(start, quote);
                self.escape(quote);
                start = self.pos;
                continue;
            }
            self.pos += 1;
        }
        self.flush(start, quote);
    }

    fn flush(&mut self, start: usize, quote: u8) {
        let chunk = &self.source[start..self.pos];
        if quote == b'"' && !chunk.bytes().any(|b| b < 0x20) {
            self.out.push_str(chunk);
            return;
        }
        for ch in chunk.chars() {
            push_escaped(&mut self.out, ch);
        }
    }

    /// Copy a backslash escape. `\'` and `` \` `` are not valid JSON escapes,
    /// so the quote character is emitted plain.
    fn escape(&mut self, quote: u8) {
        self.pos += 1;
        let Some(ch) = self.source[self.pos..].chars().next() else {
            self.out.push_str("\\\\");
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            '\'' | '`' if quote != b'"' => self.out.push(ch),
            _ => {
                self.out.push('\\');
                self.out.push(ch);
            }
        }
    }
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'{' | b'}' | b'[' | b']' | b',' | b':' | b'"' | b'\'' | b'`'
    ) || b.is_ascii_whitespace()
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        c if u32::from(c) < 0x20 => {
            out.push_str(&format!("\\u{:04x}", u32::from(c)));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quotes_bare_keys_and_hex_values() {
        assert_eq!(
            repair("{en:0x3f,lnk:0x1e}"),
            r#"{"en":"0x3f","lnk":"0x1e"}"#
        );
    }

    #[test]
    fn fills_empty_value_holes() {
        assert_eq!(
            repair("{vnd:,pnr:,tmp:ffffff80}"),
            r#"{"vnd":"","pnr":"","tmp":"ffffff80"}"#
        );
        assert_eq!(repair("{a:}"), r#"{"a":""}"#);
        assert_eq!(repair("{a:"), r#"{"a":"""#);
    }

    #[test]
    fn fills_empty_array_slots() {
        assert_eq!(repair("{a:[0x1,,0x2]}"), r#"{"a":["0x1","","0x2"]}"#);
        assert_eq!(repair("{a:[,0x1]}"), r#"{"a":["","0x1"]}"#);
        assert_eq!(repair("[0x1, ,,0x2]"), r#"["0x1","","","0x2"]"#);
        assert_eq!(repair("{a:[0x1,,]}"), r#"{"a":["0x1","",]}"#);
        // Record fields are not array slots.
        assert_eq!(repair("{a:0x1,,b:0x2}"), r#"{"a":"0x1",,"b":"0x2"}"#);
    }

    #[test]
    fn normalizes_single_and_backtick_quotes() {
        assert_eq!(
            repair("{nm:['506f7274310a',`5366700a`]}"),
            r#"{"nm":["506f7274310a","5366700a"]}"#
        );
    }

    #[test]
    fn escapes_double_quote_inside_single_quoted_string() {
        assert_eq!(repair(r#"{a:'say "hi"'}"#), r#"{"a":"say \"hi\""}"#);
        assert_eq!(repair(r"{a:'it\'s'}"), r#"{"a":"it's"}"#);
    }

    #[test]
    fn keeps_pre_quoted_fields_untouched() {
        assert_eq!(
            repair(r#"{"upt":"0x059e2a34",ip:0x0401a8c0,"id":'6f66'}"#),
            r#"{"upt":"0x059e2a34","ip":"0x0401a8c0","id":"6f66"}"#
        );
    }

    #[test]
    fn drops_whitespace_between_tokens() {
        assert_eq!(
            repair("{ ir:0, or:0,\n vlan: [ \"1\" , \"1\" ] }"),
            r#"{"ir":"0","or":"0","vlan":["1","1"]}"#
        );
    }

    #[test]
    fn handles_nested_hex_arrays_and_top_level_lists() {
        assert_eq!(
            repair("[{vid:0x01,prt:[0x00,0x02]},{vid:0x0a,prt:[[0x1],[]]}]"),
            r#"[{"vid":"0x01","prt":["0x00","0x02"]},{"vid":"0x0a","prt":[["0x1"],[]]}]"#
        );
        assert_eq!(repair("{}"), "{}");
        assert_eq!(repair("[]"), "[]");
    }

    #[test]
    fn leaves_trailing_commas_for_the_parser() {
        assert_eq!(repair("{a:0x1,}"), r#"{"a":"0x1",}"#);
    }

    #[test]
    fn leaves_unterminated_strings_unterminated() {
        assert_eq!(repair("{a:'abc}"), r#"{"a":"abc}"#);
    }

    #[test]
    fn escapes_control_characters() {
        assert_eq!(repair("{a:'x\ny'}"), r#"{"a":"x\u000ay"}"#);
    }

    #[test]
    fn repair_is_idempotent() {
        let inputs = [
            "{en:0x3f,nm:['506f7274310a','5366700a'],spd:[0x0,0x1]}",
            "{vnd:,pnr:,ser:,tmp:ffffff80,tpw:0,rpw:0,vcc:0}",
            r#"{a:'say "hi"',b:`x\`y`,"c":"q\"r"}"#,
            "[{vid:0x64,prt:[0x0,0x3]},{}]",
            "{a:0x1,}",
            "{a:'abc",
            "{a:'x\ny'}",
            "{a:[0x1,,0x2],b:[,]}",
        ];
        for input in inputs {
            let once = repair(input);
            assert_eq!(repair(&once), once, "input: {input}");
        }
    }
}
