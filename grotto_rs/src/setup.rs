use crate::waypoints::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupState {
    #[default]
    Idle,
    /// Waiting for the first sneak to pick the reference block.
    AwaitingFirstMark,
    /// Reference block picked, waiting for a second sneak to confirm it.
    AwaitingConfirmation { block: Point },
}

impl SetupState {
    pub fn highlighted(&self) -> Option<Point> {
        match self {
            SetupState::AwaitingConfirmation { block } => Some(*block),
            _ => None,
        }
    }
}

/// Drops triggers arriving within `interval_ms` of the last accepted one.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl Debounce {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, now_millis: u64) -> bool {
        if let Some(last) = self.last_accepted {
            if now_millis.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }

        self.last_accepted = Some(now_millis);
        true
    }

    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupEvent {
    Started,
    Cancelled,
    /// The reference block was picked and is now highlighted.
    Marked(Point),
    /// The highlighted block was confirmed, setup is over.
    Confirmed(Point),
}

/// The two-sneak setup flow. Knows nothing about routes or files.
#[derive(Debug, Clone)]
pub struct SetupMachine {
    state: SetupState,
    debounce: Debounce,
}

impl SetupMachine {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            state: SetupState::Idle,
            debounce: Debounce::new(debounce_ms),
        }
    }

    pub fn state(&self) -> SetupState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SetupState::Idle
    }

    pub fn highlighted(&self) -> Option<Point> {
        self.state.highlighted()
    }

    /// Start setup when idle, cancel it otherwise.
    pub fn toggle(&mut self) -> SetupEvent {
        if self.is_active() {
            self.state = SetupState::Idle;
            log::info!("Setup cancelled");
            SetupEvent::Cancelled
        } else {
            self.state = SetupState::AwaitingFirstMark;
            log::info!("Setup started");
            SetupEvent::Started
        }
    }

    /// Handle a sneak at `now_millis`.
    ///
    /// `block_below` is only queried when the first mark is accepted, and may return [None] if the
    /// player's position isn't known yet, in which case the state is left untouched.
    pub fn confirm(
        &mut self,
        now_millis: u64,
        block_below: impl FnOnce() -> eyre::Result<Option<Point>>,
    ) -> eyre::Result<Option<SetupEvent>> {
        if !self.is_active() {
            return Ok(None);
        }

        if !self.debounce.accept(now_millis) {
            log::trace!("Ignoring sneak at {now_millis}, last accepted {:?}", self.debounce.last_accepted());
            return Ok(None);
        }

        match self.state {
            SetupState::Idle => Ok(None),
            SetupState::AwaitingFirstMark => {
                let Some(block) = block_below()? else {
                    log::warn!("No player position available, couldn't mark a block");
                    return Ok(None);
                };

                self.state = SetupState::AwaitingConfirmation { block };
                log::info!("Marked block {block}");

                Ok(Some(SetupEvent::Marked(block)))
            }
            SetupState::AwaitingConfirmation { block } => {
                self.state = SetupState::Idle;
                log::info!("Confirmed block {block}");

                Ok(Some(SetupEvent::Confirmed(block)))
            }
        }
    }
}
