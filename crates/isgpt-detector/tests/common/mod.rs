//! Deterministic stand-ins for the tokenizer and the language model
//!
//! `ByteEncoder` maps every UTF-8 byte to its own token id, and
//! `NextByteModel` always bets on the byte that follows the current one in
//! value. Ascending runs such as `abcdef` are therefore nearly perfectly
//! predictable, while descending runs such as `fedcba` never are.

#![allow(dead_code)]

use candle_core::{Device, Tensor};
use isgpt_core::{Error, Result};
use isgpt_detector::{LanguageModel, TextEncoder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const VOCAB_SIZE: usize = 256;

/// Logit assigned to the predicted byte; every other byte gets 0
pub const HIT_LOGIT: f32 = 8.0;

/// Every ascending letter pair once, twice over: 51 transitions, 50 hits
pub const ASCENDING: &str = "abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz";

/// Every descending letter pair: no transition is ever predicted
pub const DESCENDING: &str = "zyxwvutsrqponmlkjihgfedcbazyxwvutsrqponmlkjihgfedcba";

/// One token per UTF-8 byte
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteEncoder;

impl TextEncoder for ByteEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.bytes().map(u32::from).collect())
    }
}

/// Predicts `(id + 1) % 256` after every token
#[derive(Debug, Clone)]
pub struct NextByteModel {
    context: usize,
    fail_on_len: Option<usize>,
    calls: Arc<AtomicUsize>,
}

impl NextByteModel {
    pub fn new(context: usize) -> Self {
        Self {
            context,
            fail_on_len: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every call whose window has exactly `len` tokens
    pub fn failing_on_len(mut self, len: usize) -> Self {
        self.fail_on_len = Some(len);
        self
    }

    /// Shared counter of model invocations
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl LanguageModel for NextByteModel {
    fn max_context(&self) -> usize {
        self.context
    }

    fn logits(&mut self, input_ids: &[i64], position_ids: &[i64]) -> Result<Tensor> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        assert_eq!(input_ids.len(), position_ids.len());
        assert!(input_ids.len() <= self.context);

        if self.fail_on_len == Some(input_ids.len()) {
            return Err(Error::inference(format!(
                "simulated failure on a window of {} tokens",
                input_ids.len()
            )));
        }

        let mut data = vec![0f32; input_ids.len() * VOCAB_SIZE];
        for (row, &id) in input_ids.iter().enumerate() {
            let next = (id as usize + 1) % VOCAB_SIZE;
            data[row * VOCAB_SIZE + next] = HIT_LOGIT;
        }

        Tensor::from_vec(data, (1, input_ids.len(), VOCAB_SIZE), &Device::Cpu)
            .map_err(|e| Error::inference(e.to_string()))
    }
}

/// `-ln p` of a correctly predicted byte
pub fn hit_nll() -> f64 {
    let hit = f64::from(HIT_LOGIT).exp();
    -(hit / (hit + (VOCAB_SIZE - 1) as f64)).ln()
}

/// `-ln p` of any other byte
pub fn miss_nll() -> f64 {
    let hit = f64::from(HIT_LOGIT).exp();
    (hit + (VOCAB_SIZE - 1) as f64).ln()
}

/// `-ln p` of `next` following `prev`
pub fn transition_nll(prev: u32, next: u32) -> f64 {
    if (prev as usize + 1) % VOCAB_SIZE == next as usize {
        hit_nll()
    } else {
        miss_nll()
    }
}

/// Perplexity `NextByteModel` assigns to `text` scored in a single window
pub fn expected_perplexity(text: &str) -> f64 {
    let bytes = text.as_bytes();
    if bytes.len() < 2 {
        return 1.0;
    }
    let total: f64 = bytes
        .windows(2)
        .map(|pair| transition_nll(u32::from(pair[0]), u32::from(pair[1])))
        .sum();
    (total / (bytes.len() - 1) as f64).exp()
}

/// Total NLL of `tokens` when only `positions` are scored
pub fn nll_at(tokens: &[u32], positions: impl IntoIterator<Item = usize>) -> f64 {
    positions
        .into_iter()
        .map(|i| transition_nll(tokens[i - 1], tokens[i]))
        .sum()
}
