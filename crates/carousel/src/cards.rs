use std::collections::HashMap;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

impl CardFace {
    pub fn flipped(self) -> Self {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum LabelVisibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardState {
    pub face: CardFace,
    pub label: LabelVisibility,
}

/// Per-card presentation flags keyed by wrapped position.
#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    faces: HashMap<usize, CardFace>,
    labels: LabelVisibility,
}

impl CardDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(&self, position: usize) -> CardState {
        CardState {
            face: self.faces.get(&position).copied().unwrap_or_default(),
            label: self.labels,
        }
    }

    pub fn flip(&mut self, position: usize) -> CardFace {
        let face = self.faces.entry(position).or_default();
        *face = face.flipped();
        *face
    }

    pub fn hide_labels(&mut self) {
        self.labels = LabelVisibility::Hidden;
    }

    pub fn reveal_labels(&mut self) {
        self.labels = LabelVisibility::Visible;
    }

    pub fn labels(&self) -> LabelVisibility {
        self.labels
    }

    pub fn reset(&mut self) {
        self.faces.clear();
        self.labels = LabelVisibility::Visible;
    }
}
