use super::error::BencodeError;

/// A forward-only read position over a fully materialized input buffer.
///
/// The offset never moves backwards; every failed read reports
/// [`BencodeError::UnexpectedEnd`] at the current offset.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the byte at the current offset without consuming it.
    pub(crate) fn peek(&self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEnd { offset: self.pos })
    }

    /// Consumes `n` bytes and returns them.
    pub(crate) fn advance(&mut self, n: usize) -> Result<&'a [u8], BencodeError> {
        let data = self.data;
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= data.len())
            .ok_or(BencodeError::UnexpectedEnd { offset: data.len() })?;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Consumes a single byte.
    pub(crate) fn next_byte(&mut self) -> Result<u8, BencodeError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns the input consumed between `start` and the current offset.
    pub(crate) fn consumed_since(&self, start: usize) -> &'a [u8] {
        let data = self.data;
        &data[start..self.pos]
    }
}
