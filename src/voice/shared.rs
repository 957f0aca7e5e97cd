use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use super::{Params, Voice, VoiceStatus};
use crate::rom::SampleSource;

const PARAMS_QUEUE_SIZE: usize = 64;
const STATUS_QUEUE_SIZE: usize = 16;

/// Control-thread side of a [`SharedVoice`].
pub struct VoiceHandle {
    tx: Producer<Params>,
    status_rx: Consumer<VoiceStatus>,
    last_status: Option<VoiceStatus>,
}

impl VoiceHandle {
    /// Queue a new parameter snapshot. Returns `false` if the audio thread
    /// has fallen behind and the queue is full.
    pub fn send(&mut self, params: Params) -> bool {
        self.tx.push(params).is_ok()
    }

    /// Newest status published by the audio thread, if any arrived yet.
    pub fn status(&mut self) -> Option<VoiceStatus> {
        while let Ok(status) = self.status_rx.pop() {
            self.last_status = Some(status);
        }
        self.last_status
    }
}

/// Audio-thread side: a [`Voice`] fed by a wait-free parameter queue.
///
/// Every block drains the queue and renders with the newest snapshot, so a
/// block never sees a half-written `Params`.
pub struct SharedVoice {
    voice: Voice,
    params: Params,
    rx: Consumer<Params>,
    status_tx: Producer<VoiceStatus>,
}

impl SharedVoice {
    pub fn new(store: Arc<dyn SampleSource>, sample_rate: f32) -> (Self, VoiceHandle) {
        let (tx, rx) = RingBuffer::<Params>::new(PARAMS_QUEUE_SIZE);
        let (status_tx, status_rx) = RingBuffer::<VoiceStatus>::new(STATUS_QUEUE_SIZE);

        let handle = VoiceHandle {
            tx,
            status_rx,
            last_status: None,
        };
        let shared = Self {
            voice: Voice::new(store, sample_rate),
            params: Params::default(),
            rx,
            status_tx,
        };

        (shared, handle)
    }

    pub fn render(&mut self, out: &mut [f32]) {
        while let Ok(params) = self.rx.pop() {
            self.params = params;
        }

        self.voice.process(&self.params, out);

        // a full status queue just means nobody is looking
        let _ = self.status_tx.push(self.voice.status());
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn voice_mut(&mut self) -> &mut Voice {
        &mut self.voice
    }
}
