use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    Title(String),
    Text(String),
    /// One line of an interaction narrative (combat turn, pickup, trap).
    Event(String),
    Status(String),
}

/// Ordered blocks of presentation text. Blank entries are dropped.
#[derive(Default, Debug)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Title(s));
        }
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Text(s));
        }
    }

    /// Split a multi-line narrative into one event block per line.
    pub fn narrate(&mut self, narrative: &str) {
        for line in narrative.lines().filter(|l| !l.trim().is_empty()) {
            self.blocks.push(OutputBlock::Event(line.to_string()));
        }
    }

    pub fn set_status(&mut self, s: impl Into<String>) {
        let s = s.into();
        if s.trim().is_empty() {
            return;
        }

        // ensure only one Status block exists, always last
        self.blocks.retain(|b| !matches!(b, OutputBlock::Status(_)));
        self.blocks.push(OutputBlock::Status(s));
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut in_events = false;
        for block in &self.blocks {
            match block {
                OutputBlock::Title(t) => writeln!(f, "\n=== {} ===", t)?,
                OutputBlock::Text(line) => writeln!(f, "{}", line)?,
                OutputBlock::Event(ev) => {
                    if !in_events {
                        writeln!(f)?;
                    }
                    writeln!(f, "  {}", ev)?;
                }
                OutputBlock::Status(s) => writeln!(f, "\n{}", s)?,
            }
            in_events = matches!(block, OutputBlock::Event(_));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_unique_and_last() {
        let mut out = Output::new();
        out.set_status("hp 5");
        out.say("hello");
        out.set_status("hp 4");
        assert_eq!(
            out.blocks,
            vec![
                OutputBlock::Text("hello".into()),
                OutputBlock::Status("hp 4".into())
            ]
        );
    }

    #[test]
    fn narrative_lines_become_events() {
        let mut out = Output::new();
        out.narrate("a\n\nb");
        out.say("   ");
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.to_string(), "\n  a\n  b\n");
    }
}
