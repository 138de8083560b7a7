//! Recording pins, bus and delay for the unit tests.
//!
//! Every mock appends to one shared [`Log`], so the tests can check the exact order of line
//! changes, transfers and waits. [`capture_logs`] collects the `log` records of the calling
//! thread.

use std::{cell::RefCell, rc::Rc, sync::Once};

use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::spi::Write as SpiWrite;
use hal::digital::v2::OutputPin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    Spi(Vec<u8>),
    DelayUs(u32),
    DelayMs(u32),
}

/// One transfer and the level of DC while it was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: bool,
    pub bytes: Vec<u8>,
}

pub fn cmd(byte: u8) -> Frame {
    Frame {
        data: false,
        bytes: vec![byte],
    }
}

pub fn data(bytes: &[u8]) -> Frame {
    Frame {
        data: true,
        bytes: bytes.to_vec(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn new() -> Self {
        Log::default()
    }

    pub fn pin(&self, name: &'static str) -> MockPin {
        MockPin {
            name,
            log: self.clone(),
        }
    }

    pub fn spi(&self) -> MockSpi {
        MockSpi {
            log: self.clone(),
            fail: false,
        }
    }

    pub fn failing_spi(&self) -> MockSpi {
        MockSpi {
            log: self.clone(),
            fail: true,
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay { log: self.clone() }
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// last level set on a pin, None if it was never touched
    pub fn level(&self, name: &str) -> Option<bool> {
        self.0.borrow().iter().rev().find_map(|event| match event {
            Event::Pin(pin, level) if *pin == name => Some(*level),
            _ => None,
        })
    }

    /// transfers tagged with the DC level, DC starts out high
    pub fn frames(&self) -> Vec<Frame> {
        let mut dc = true;
        let mut frames = Vec::new();
        for event in self.0.borrow().iter() {
            match event {
                Event::Pin("dc", level) => dc = *level,
                Event::Spi(bytes) => frames.push(Frame {
                    data: dc,
                    bytes: bytes.clone(),
                }),
                _ => {}
            }
        }
        frames
    }

    /// index of the first event equal to `event`
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }
}

pub struct MockPin {
    name: &'static str,
    log: Log,
}

impl OutputPin for MockPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), ()> {
        self.log.push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), ()> {
        self.log.push(Event::Pin(self.name, true));
        Ok(())
    }
}

pub struct MockSpi {
    log: Log,
    fail: bool,
}

impl SpiWrite<u8> for MockSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.log.push(Event::Spi(words.to_vec()));
        Ok(())
    }
}

pub struct MockDelay {
    log: Log,
}

impl DelayUs<u8> for MockDelay {
    fn delay_us(&mut self, us: u8) {
        self.log.push(Event::DelayUs(us.into()));
    }
}

impl DelayUs<u16> for MockDelay {
    fn delay_us(&mut self, us: u16) {
        self.log.push(Event::DelayUs(us.into()));
    }
}

impl DelayMs<u8> for MockDelay {
    fn delay_ms(&mut self, ms: u8) {
        self.log.push(Event::DelayMs(ms.into()));
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|records| records.borrow_mut().push(record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// install the capturing logger and forget what this thread logged so far
pub fn capture_logs() {
    INSTALL.call_once(|| {
        // only fails if a logger is already installed
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// messages logged on this thread since the last [`capture_logs`]
pub fn logged() -> Vec<String> {
    RECORDS.with(|records| records.borrow().clone())
}
