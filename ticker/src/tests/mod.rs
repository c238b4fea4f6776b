use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use ustick_sim::SimTimer;

use crate::clock::UsTicker;

mod deadline;

/// Simulated timer plus an installed, initialized ticker whose hook
/// counts deliveries.
pub(crate) struct Fixture {
    pub sim: Arc<SimTimer>,
    pub ticker: Arc<UsTicker<Arc<SimTimer>>>,
    fired: Arc<AtomicU32>,
}

pub(crate) fn fixture(frequency_hz: u32) -> Fixture {
    let sim = Arc::new(SimTimer::new(frequency_hz));
    let fired = Arc::new(AtomicU32::new(0));
    let probe = Arc::clone(&fired);
    let ticker = UsTicker::new(Arc::clone(&sim), move || {
        probe.fetch_add(1, Ordering::SeqCst);
    });
    ticker.install();
    ticker.init();
    Fixture { sim, ticker, fired }
}

impl Fixture {
    pub fn fired(&self) -> u32 {
        self.fired.load(Ordering::SeqCst)
    }
}
