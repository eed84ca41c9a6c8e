//! Seam for the moab document parser.
//!
//! Signature catalogs and file inventory differences come back from the
//! catalog as XML documents. Parsing them is not this crate's job: callers
//! inject a [`DocumentParser`] and get back whatever structured document it
//! produces.

use std::fmt::Display;

/// Turns a raw response body into a structured document.
pub trait DocumentParser {
    type Document;
    type Error: Display;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Document, Self::Error>;
}

/// Any `Fn(&[u8]) -> Result<D, E>` is a parser.
impl<F, D, E> DocumentParser for F
where
    F: Fn(&[u8]) -> Result<D, E>,
    E: Display,
{
    type Document = D;
    type Error = E;

    fn parse(&self, bytes: &[u8]) -> Result<D, E> {
        self(bytes)
    }
}
