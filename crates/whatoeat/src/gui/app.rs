use super::view::{Frame, Renderer};
use crate::config;
use crate::events::{AppEvent, AppOutput};
use crate::sys::timer;
use async_channel::{Receiver, Sender};
use carousel::{
    Bundle, CardDeck, CarouselSelector, DataSource, Item, SpinConfig, SpinStep, WrappedList,
};
use rand::rngs::StdRng;
use tokio::time::Instant;

pub struct AppInit {
    pub bundle: Bundle,
    pub source: DataSource,
    pub spin: SpinConfig,
    pub rng: StdRng,
    pub tx: Sender<AppEvent>,
    pub output: Option<Sender<AppOutput>>,
}

/// Owns all selection and card state. Every mutation happens inside
/// [`AppModel::update`], one event at a time.
pub struct AppModel<R: Renderer> {
    selector: CarouselSelector<Item>,
    deck: CardDeck,
    source: DataSource,
    map_visible: bool,
    bundle: Bundle,
    spin: SpinConfig,
    rng: StdRng,
    spin_started: Option<Instant>,
    tx: Sender<AppEvent>,
    output: Option<Sender<AppOutput>>,
    renderer: R,
}

impl<R: Renderer> AppModel<R> {
    pub fn new(init: AppInit, renderer: R) -> Self {
        let AppInit {
            bundle,
            source,
            spin,
            rng,
            tx,
            output,
        } = init;

        let mut model = Self {
            selector: CarouselSelector::new(WrappedList::default()),
            deck: CardDeck::new(),
            source,
            map_visible: false,
            bundle,
            spin,
            rng,
            spin_started: None,
            tx,
            output,
            renderer,
        };
        model.switch_source(source);
        model
    }

    pub fn selector(&self) -> &CarouselSelector<Item> {
        &self.selector
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub async fn run(mut self, rx: Receiver<AppEvent>) -> Self {
        self.render();
        while let Ok(event) = rx.recv().await {
            if !self.update(event) {
                break;
            }
            self.render();
        }
        self
    }

    /// Applies one event. Returns `false` when the model should stop.
    pub fn update(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Swipe(index) => {
                if self.selector.on_index_changed(index).is_some() {
                    timer::defer(&self.tx, AppEvent::CommitCorrection(self.selector.epoch()));
                }
            }
            AppEvent::CommitCorrection(epoch) => {
                if self.is_current(epoch) {
                    self.selector.commit_pending_correction();
                }
            }
            AppEvent::Spin => {
                if let Some(delay) = self.selector.spin(&mut self.rng, &self.spin) {
                    self.deck.hide_labels();
                    self.map_visible = false;
                    self.spin_started = Some(Instant::now());
                    timer::schedule(&self.tx, delay, AppEvent::SpinTick(self.selector.epoch()));
                }
            }
            AppEvent::SpinTick(epoch) => {
                if self.is_current(epoch) {
                    self.advance_spin(epoch);
                }
            }
            AppEvent::RevealLabels(epoch) => {
                if self.is_current(epoch) && !self.selector.is_spinning() {
                    self.deck.reveal_labels();
                }
            }
            AppEvent::Flip(position) => {
                if !self.selector.list().is_empty() {
                    let position = position.unwrap_or(self.selector.current_index());
                    self.deck.flip(position);
                }
            }
            AppEvent::SwitchSource(source) => self.switch_source(source),
            AppEvent::ShowMap => self.map_visible = self.source.map().is_some(),
            AppEvent::HideMap => self.map_visible = false,
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.spin = new_config.spin_config();
                    self.bundle = Bundle::discover(new_config.data_dir.clone());
                    self.switch_source(new_config.source);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppEvent::Quit => return false,
        }
        true
    }

    pub fn frame(&self) -> Frame {
        let index = self.selector.current_index();
        Frame {
            source: self.source,
            index,
            position: self.selector.list().real_index(index).unwrap_or_default(),
            location: self.source.location(),
            item: self.selector.current_item().cloned(),
            card: self.deck.card(index),
            spinning: self.selector.is_spinning(),
            map: self.map_visible.then(|| self.source.map()).flatten(),
        }
    }

    fn render(&mut self) {
        let frame = self.frame();
        self.renderer.render(&frame);
    }

    fn is_current(&self, epoch: u64) -> bool {
        epoch == self.selector.epoch()
    }

    fn advance_spin(&mut self, epoch: u64) {
        let elapsed = self
            .spin_started
            .map(|started| started.elapsed())
            .unwrap_or_default();

        match self.selector.tick(elapsed) {
            Some(SpinStep::Advanced { next_delay, .. }) => {
                timer::schedule(&self.tx, next_delay, AppEvent::SpinTick(epoch));
            }
            Some(SpinStep::Settled { .. }) => {
                self.spin_started = None;
                timer::schedule(&self.tx, self.spin.reveal_delay, AppEvent::RevealLabels(epoch));
                if let Some(item) = self.selector.current_item() {
                    log::info!("Settled on '{}'", item.name);
                    self.emit(AppOutput::Settled(item.clone()));
                }
            }
            None => {}
        }
    }

    fn switch_source(&mut self, source: DataSource) {
        let items = self.bundle.load_or_empty(source);
        let count = items.len();

        self.source = source;
        self.selector.switch_data_source(WrappedList::new(items));
        self.deck.reset();
        self.map_visible = false;
        self.spin_started = None;

        self.emit(AppOutput::Loaded { source, count });
    }

    fn emit(&self, output: AppOutput) {
        if let Some(tx) = &self.output
            && tx.try_send(output).is_err()
        {
            log::debug!("Output receiver gone");
        }
    }
}
