//! Mock analysis of a rehearsal message
//!
//! Tone and scores are random; recommendations come from a few keyword
//! heuristics evaluated in a fixed order.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Delivery tone. Doubles as the user-selected AI mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Calm,
    Assertive,
    Friendly,
    Professional,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Calm => "Calm",
            Tone::Assertive => "Assertive",
            Tone::Friendly => "Friendly",
            Tone::Professional => "Professional",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Some(Tone::Calm),
            "assertive" => Some(Tone::Assertive),
            "friendly" => Some(Tone::Friendly),
            "professional" => Some(Tone::Professional),
            _ => None,
        }
    }

    pub fn all() -> [Tone; 4] {
        [Tone::Calm, Tone::Assertive, Tone::Friendly, Tone::Professional]
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowest score the generator produces
pub const SCORE_MIN: u8 = 60;
/// Exclusive upper bound for scores
pub const SCORE_MAX: u8 = 100;

pub const RECOMMEND_EXAMPLE: &str =
    "Try adding a specific example or detail to strengthen your point.";
pub const RECOMMEND_PREVENTION: &str =
    "You acknowledged the mistake — add how you will avoid it in future.";
pub const RECOMMEND_OWNERSHIP: &str =
    "Good ownership. Consider adding measurable achievements to support your request.";
pub const RECOMMEND_CLOSING: &str =
    "Well structured — consider a short closing line that states your desired outcome.";

/// Messages shorter than this (in characters) get the "add an example" hint
const SHORT_MESSAGE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub tone: Tone,
    pub confidence: u8,
    pub clarity: u8,
    pub recommendations: Vec<String>,
}

/// Source of the random parts of a feedback record
pub trait FeedbackSource {
    fn tone(&mut self) -> Tone;

    /// A score in `[SCORE_MIN, SCORE_MAX)`
    fn score(&mut self) -> u8;
}

/// Uniform randomness backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> FeedbackSource for RngSource<R> {
    fn tone(&mut self) -> Tone {
        let tones = Tone::all();
        tones[self.0.random_range(0..tones.len())]
    }

    fn score(&mut self) -> u8 {
        self.0.random_range(SCORE_MIN..SCORE_MAX)
    }
}

/// Keyword heuristics, in evaluation order
pub fn recommendations(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut recs = Vec::new();

    if text.chars().count() < SHORT_MESSAGE_CHARS {
        recs.push(RECOMMEND_EXAMPLE.to_string());
    }
    if lower.contains("sorry") {
        recs.push(RECOMMEND_PREVENTION.to_string());
    }
    if lower.contains("i believe") || lower.contains("i feel") {
        recs.push(RECOMMEND_OWNERSHIP.to_string());
    }
    if recs.is_empty() {
        recs.push(RECOMMEND_CLOSING.to_string());
    }

    recs
}

pub fn analyze<S: FeedbackSource + ?Sized>(text: &str, source: &mut S) -> FeedbackRecord {
    let tone = source.tone();
    let confidence = source.score();
    let clarity = source.score();

    FeedbackRecord {
        tone,
        confidence,
        clarity,
        recommendations: recommendations(text),
    }
}
