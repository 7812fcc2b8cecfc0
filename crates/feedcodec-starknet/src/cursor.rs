//! Left-to-right cursor over a calldata word sequence.

use feedcodec_core::{error::DecodeError, word::Word};

/// Borrowing cursor over calldata. Words are never revisited.
#[derive(Debug, Clone)]
pub struct WordCursor<'a> {
    words: &'a [Word],
    position: usize,
}

impl<'a> WordCursor<'a> {
    pub fn new(words: &'a [Word]) -> Self {
        WordCursor { words, position: 0 }
    }

    /// Consume and return the next word.
    pub fn take_one(&mut self) -> Result<&'a Word, DecodeError> {
        let word = self.peek()?;
        self.position += 1;
        Ok(word)
    }

    /// Consume and return the next `n` words. Nothing is consumed on failure.
    pub fn take_n(&mut self, n: usize) -> Result<&'a [Word], DecodeError> {
        if n > self.remaining() {
            return Err(self.exhausted(n));
        }
        let slice = &self.words[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// The next word, without consuming it.
    pub fn peek(&self) -> Result<&'a Word, DecodeError> {
        self.words.get(self.position).ok_or_else(|| self.exhausted(1))
    }

    /// Interpret the next word as an array length without consuming it.
    pub fn peek_length(&self) -> Result<usize, DecodeError> {
        Ok(self.peek()?.to_usize()?)
    }

    /// Whether the next word is numerically zero.
    pub fn peek_is_zero(&self) -> Result<bool, DecodeError> {
        Ok(self.peek()?.is_zero()?)
    }

    /// Read and consume a length prefix.
    pub fn take_length(&mut self) -> Result<usize, DecodeError> {
        let len = self.peek_length()?;
        self.position += 1;
        Ok(len)
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.position
    }

    pub fn consumed(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn exhausted(&self, needed: usize) -> DecodeError {
        DecodeError::ExhaustedStream {
            needed,
            remaining: self.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &[&str]) -> Vec<Word> {
        raw.iter().map(|w| Word::new(*w)).collect()
    }

    #[test]
    fn take_one_in_order() {
        let data = words(&["0x1", "0x2"]);
        let mut cursor = WordCursor::new(&data);
        assert_eq!(cursor.take_one().unwrap().as_str(), "0x1");
        assert_eq!(cursor.take_one().unwrap().as_str(), "0x2");
        assert!(matches!(
            cursor.take_one(),
            Err(DecodeError::ExhaustedStream { needed: 1, remaining: 0 })
        ));
    }

    #[test]
    fn take_n_is_all_or_nothing() {
        let data = words(&["0x1", "0x2", "0x3"]);
        let mut cursor = WordCursor::new(&data);
        assert!(matches!(
            cursor.take_n(4),
            Err(DecodeError::ExhaustedStream { needed: 4, remaining: 3 })
        ));
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(cursor.take_n(2).unwrap(), &data[..2]);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn huge_take_n_does_not_overflow() {
        let data = words(&["0x1"]);
        let mut cursor = WordCursor::new(&data);
        cursor.take_one().unwrap();
        assert!(cursor.take_n(usize::MAX).is_err());
    }

    #[test]
    fn peek_length_does_not_consume() {
        let data = words(&["0x10", "0x0"]);
        let mut cursor = WordCursor::new(&data);
        assert_eq!(cursor.peek_length().unwrap(), 16);
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(cursor.take_length().unwrap(), 16);
        assert!(cursor.peek_is_zero().unwrap());
    }

    #[test]
    fn invalid_length_word() {
        let data = words(&["0xnope"]);
        let cursor = WordCursor::new(&data);
        assert!(matches!(
            cursor.peek_length(),
            Err(DecodeError::InvalidWord(_))
        ));
    }
}
