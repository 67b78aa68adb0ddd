//! Line-oriented segmentation of the reference document into instruction
//! sections.
//!
//! The segmenter is a two-state machine (outside/inside an instruction) over
//! the document's lines. A boundary marker closes the open instruction; a new
//! title line closes it as well, since the source does not always put a
//! boundary marker between two instructions.
//!
//! The buffer still open when input runs out is dropped, not emitted. Only
//! boundary markers and title lines flush sections.

use langref_docs_core::Section;

use super::classify::{is_instruction_title_line, is_section_boundary_marker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside,
}

/// Lazy, single-pass iterator over the instruction sections of a document.
///
/// Created by [`segment`].
#[derive(Debug)]
pub struct Segmenter<'a, I> {
    lines: I,
    buffer: Vec<&'a str>,
    state: State,
}

/// Splits `lines` into instruction sections, in document order.
///
/// # Examples
///
/// ```
/// use langref_docs_extract::parser::segment;
///
/// let doc = ".. _i_ret:\n\n'``ret``' Instruction\n^^^^^^^^^^^^^^^^^^^^^\n\nReturns.\n\n.. _i_br:\n";
/// let sections: Vec<_> = segment(doc.lines()).collect();
///
/// assert_eq!(sections.len(), 1);
/// assert_eq!(sections[0].lines()[2], "'``ret``' Instruction");
/// ```
pub fn segment<'a, I>(lines: I) -> Segmenter<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Segmenter {
        lines: lines.into_iter(),
        buffer: Vec::new(),
        state: State::Outside,
    }
}

impl<'a, I> Segmenter<'a, I> {
    fn take_section(&mut self) -> Option<Section<'a>> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Section::new(std::mem::take(&mut self.buffer)))
    }

    /// Advances the state machine by one line, returning a section when the
    /// line closes one.
    fn feed(&mut self, line: &'a str) -> Option<Section<'a>> {
        let mut completed = None;

        if is_section_boundary_marker(line) && !self.buffer.is_empty() {
            if self.state == State::Inside {
                completed = self.take_section();
                self.state = State::Outside;
            }
            self.buffer.clear();
        }

        if is_instruction_title_line(line) {
            if self.state == State::Inside {
                completed = self.take_section();
            }
            self.state = State::Inside;
        }

        self.buffer.push(line);
        completed
    }
}

impl<'a, I> Iterator for Segmenter<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if let Some(section) = self.feed(line) {
                return Some(section);
            }
        }
    }
}
