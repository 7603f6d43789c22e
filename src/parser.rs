use crate::cursor::{is_printable, is_terminator};
use crate::error::{ErrorKind, InfoError};
use crate::reader::{Event, Reader};
use crate::value::Value;
use log::debug;
use std::io::Read;

// Token and line parsers. They run on the reader itself because `%` and `+`
// values depend on the attribute currently visible for the key being parsed.
impl<R: Read> Reader<R> {
    // === Line Parsing ===

    /// Element ::= "[" Tag [ Group ] "]"
    pub(crate) fn parse_element(&mut self) -> Result<(), InfoError> {
        self.cursor.expect()?;
        self.cursor.skip_spacing()?;

        self.cursor.clear_scratch();
        while is_printable(self.cursor.chr()) && self.cursor.chr() != b']' {
            self.cursor.push_chr()?;
            self.cursor.expect()?;
        }
        let tag = self.cursor.scratch_text().to_lowercase();

        self.cursor.skip_spacing()?;
        let parameters = if self.cursor.chr() == b']' {
            self.cursor.next()?;
            Value::Empty
        } else {
            self.parse_group(None, b']')?
        };
        // Anything after the closing bracket is ignored.
        self.cursor.skip_line()?;

        debug!("opened [{}] at depth {}", tag, self.line_depth);
        self.scopes.push(self.line_depth, tag, parameters);
        self.event = Event::ElementStart;
        self.value = Value::Empty;
        Ok(())
    }

    /// Attribute ::= Token Token { Token }
    /// Option    ::= Token
    pub(crate) fn parse_attribute(&mut self) -> Result<(), InfoError> {
        let first = self.parse_token()?;
        self.cursor.skip_spacing()?;

        if self.cursor.chr() == b'\n' || self.cursor.is_eof() {
            self.scopes.add_option(first.clone());
            self.value = first;
            self.event = Event::Option;
            return Ok(());
        }

        let key = first.string("").to_lowercase();
        self.key = Some(key.clone());

        let mut value = self.parse_token()?;
        self.cursor.skip_spacing()?;
        if is_printable(self.cursor.chr()) {
            value = self.parse_group(Some(value), b'\n')?;
        }

        self.scopes.set_attribute(key, value.clone());
        self.value = value;
        self.event = Event::Attribute;
        Ok(())
    }

    // === Token Parsing ===

    fn parse_token(&mut self) -> Result<Value, InfoError> {
        self.cursor.clear_scratch();

        match self.cursor.chr() {
            b'"' | b'\'' => self.parse_text(),
            b'(' => {
                self.cursor.expect()?;
                self.parse_group(None, b')')
            }
            b'+' => self.parse_modifier(),
            b'-' | b'.' => {
                self.cursor.push_chr()?;
                self.cursor.next()?;
                if self.cursor.chr().is_ascii_digit() {
                    self.parse_number()
                } else {
                    self.parse_general()
                }
            }
            b if b.is_ascii_digit() => self.parse_number(),
            b if is_terminator(b) => Err(self
                .cursor
                .error(ErrorKind::UnexpectedCharacter { found: b as char })),
            _ => self.parse_general(),
        }
    }

    /// Quoted text, copied verbatim apart from `\\`, `\t`, `\n` and an
    /// escaped delimiter. The closing delimiter is consumed.
    fn parse_text(&mut self) -> Result<Value, InfoError> {
        let delimiter = self.cursor.chr();
        self.cursor.expect()?;

        while self.cursor.chr() != delimiter {
            if self.cursor.chr() == b'\\' {
                self.cursor.expect()?;
                match self.cursor.chr() {
                    b'\\' => self.cursor.push(b'\\')?,
                    b't' => self.cursor.push(b'\t')?,
                    b'n' => self.cursor.push(b'\n')?,
                    b if b == delimiter => self.cursor.push(b)?,
                    b => {
                        self.cursor.push(b'\\')?;
                        self.cursor.push(b)?;
                    }
                }
            } else {
                self.cursor.push_chr()?;
            }
            self.cursor.expect()?;
        }
        self.cursor.next()?;

        Ok(Value::Text(self.cursor.scratch_text()))
    }

    /// Number ::= Digits [ "." Digits ] [ Postfix ]
    ///
    /// A leading sign or dot may already be in the scratch buffer. `%` takes
    /// that share of the current key's visible value; a registered unit
    /// scales the number; any other postfix turns the token into text.
    fn parse_number(&mut self) -> Result<Value, InfoError> {
        self.read_digits()?;
        if self.cursor.chr() == b'.' && !self.cursor.scratch().contains(&b'.') {
            self.cursor.push_chr()?;
            self.cursor.next()?;
            self.read_digits()?;
        }

        let text = self.cursor.scratch_text();
        let number: f64 = text.parse().map_err(|_| {
            self.cursor
                .error(ErrorKind::InvalidNumber { text: text.clone() })
        })?;

        let chr = self.cursor.chr();
        if !is_printable(chr) || is_terminator(chr) {
            return Ok(Value::Number(number));
        }

        self.cursor.clear_scratch();
        while is_printable(self.cursor.chr()) && !is_terminator(self.cursor.chr()) {
            self.cursor.push_chr()?;
            self.cursor.next()?;
        }
        let postfix = self.cursor.scratch_text();

        if postfix == "%" {
            return Ok(Value::Number(self.visible_float() * (number / 100.0)));
        }
        match self.config.apply_unit_scale(&postfix, number) {
            Some(scaled) => Ok(Value::Number(scaled)),
            None => Ok(Value::Text(format!("{text}{postfix}"))),
        }
    }

    fn read_digits(&mut self) -> Result<(), InfoError> {
        while self.cursor.chr().is_ascii_digit() {
            self.cursor.push_chr()?;
            self.cursor.next()?;
        }
        Ok(())
    }

    /// Modifier ::= "+" Number
    ///
    /// Adds the current key's visible value to the number. Without a digit the
    /// token is a plain word that keeps its `+`.
    fn parse_modifier(&mut self) -> Result<Value, InfoError> {
        self.cursor.next()?;
        if matches!(self.cursor.chr(), b'-' | b'.') {
            self.cursor.push_chr()?;
            self.cursor.next()?;
        }

        if !self.cursor.chr().is_ascii_digit() {
            self.cursor.prepend(b'+')?;
            return self.parse_general();
        }

        let base = self.visible_float();
        match self.parse_number()? {
            Value::Number(number) => Ok(Value::Number(base + number)),
            Value::Text(text) => Ok(Value::Text(format!("+{text}"))),
            other => Ok(other),
        }
    }

    /// Any run of printable bytes, lower-cased.
    fn parse_general(&mut self) -> Result<Value, InfoError> {
        while is_printable(self.cursor.chr()) && !is_terminator(self.cursor.chr()) {
            self.cursor.push_chr()?;
            self.cursor.next()?;
        }
        Ok(Value::Text(self.cursor.scratch_text().to_lowercase()))
    }

    /// Group ::= Token { Token } Delimiter
    ///
    /// A newline-delimited group is an attribute line and also ends at end of
    /// file. Its newline is left for the next line advance.
    fn parse_group(&mut self, first: Option<Value>, delimiter: u8) -> Result<Value, InfoError> {
        let mut values: Vec<Value> = first.into_iter().collect();
        self.cursor.skip_spacing()?;

        loop {
            let chr = self.cursor.chr();
            if chr == delimiter {
                break;
            }
            if self.cursor.is_eof() {
                if delimiter == b'\n' {
                    break;
                }
                return Err(self.cursor.error(ErrorKind::UnexpectedEof));
            }
            if chr == b'\n' {
                return Err(self.cursor.error(ErrorKind::MultilineGroup));
            }
            if values.len() >= self.config.group_limit {
                return Err(self.cursor.error(ErrorKind::GroupLimitExceeded {
                    limit: self.config.group_limit,
                }));
            }

            let value = self.parse_token()?;
            values.push(value);
            self.cursor.skip_spacing()?;
        }

        self.cursor.skip_unless(b'\n')?;
        Ok(Value::Group(values))
    }

    /// The visible value of the attribute being parsed, or 0.
    fn visible_float(&self) -> f64 {
        self.key
            .as_deref()
            .and_then(|key| self.scopes.attribute(key))
            .map_or(0.0, |value| value.float(0.0))
    }
}
