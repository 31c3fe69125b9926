use super::LOADING_TEXT;
use carousel::{CardFace, CardState, DataSource, Item, LabelVisibility, MapOverlay};
use std::io::Write;

/// Snapshot of what should be on screen after an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub source: DataSource,
    pub index: usize,
    pub position: usize,
    pub location: Option<&'static str>,
    pub item: Option<Item>,
    pub card: CardState,
    pub spinning: bool,
    pub map: Option<MapOverlay>,
}

impl Frame {
    pub fn caption(&self) -> String {
        if let Some(map) = &self.map {
            return format!("[{}] {}", map.title, map.image);
        }

        let Some(item) = &self.item else {
            return LOADING_TEXT.to_string();
        };

        let text = match (self.card.label, self.card.face) {
            (LabelVisibility::Hidden, _) => "???".to_string(),
            (LabelVisibility::Visible, CardFace::Front) => item.name.to_string(),
            (LabelVisibility::Visible, CardFace::Back) => item.description.to_string(),
        };

        let mut caption = format!("#{} {}", self.position + 1, text);
        if let Some(location) = self.location {
            caption = format!("{} {}", location, caption);
        }
        if self.spinning {
            caption.push_str(" ...");
        }
        caption
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

/// Writes each changed frame's caption as a line of text.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    last: Option<String>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        let caption = frame.caption();
        if self.last.as_ref() == Some(&caption) {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", caption) {
            log::error!("Render error: {}", e);
        }
        self.last = Some(caption);
    }
}

#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame) {
        log::debug!("{} ({})", frame.caption(), frame.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(item: Option<Item>) -> Frame {
        Frame {
            source: DataSource::Information,
            index: 2,
            position: 1,
            location: None,
            item,
            card: CardState::default(),
            spinning: false,
            map: None,
        }
    }

    #[test]
    fn test_caption_follows_card_state() {
        let mut f = frame(Some(Item::new("Subway", "三明治")));
        assert_eq!(f.caption(), "#2 Subway");

        f.card.face = CardFace::Back;
        assert_eq!(f.caption(), "#2 三明治");

        f.card.label = LabelVisibility::Hidden;
        f.spinning = true;
        assert_eq!(f.caption(), "#2 ??? ...");
    }

    #[test]
    fn test_caption_names_location() {
        let mut f = frame(Some(Item::new("F", "sixth")));
        f.source = DataSource::BackDoor;
        f.location = DataSource::BackDoor.location();
        f.position = 0;
        assert_eq!(f.caption(), "後門 #1 F");

        f.spinning = true;
        assert_eq!(f.caption(), "後門 #1 F ...");
    }

    #[test]
    fn test_caption_for_empty_deck_and_map() {
        let mut f = frame(None);
        assert_eq!(f.caption(), LOADING_TEXT);

        f.map = DataSource::BackDoor.map();
        assert_eq!(f.caption(), "[後門地圖] back_door_map");
    }

    #[test]
    fn test_text_renderer_skips_repeats() {
        let mut renderer = TextRenderer::new(Vec::new());
        let f = frame(Some(Item::new("A", "a")));
        renderer.render(&f);
        renderer.render(&f);
        renderer.render(&frame(None));

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, format!("#2 A\n{}\n", LOADING_TEXT));
    }
}
