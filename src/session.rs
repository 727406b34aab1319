//! UI-agnostic rehearsal session state
//!
//! Everything the view shows lives here: the scenario store, the active
//! selection, the transcript, the live feedback and the draft inputs. The
//! transcript and the feedback are only ever reset together.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::feedback::{analyze, FeedbackRecord, FeedbackSource, Tone};
use crate::scenario::{Scenario, ScenarioStore};

/// Identifier of a transcript turn, unique for the life of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurnId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: TurnId,
    pub from: Speaker,
    pub text: String,
}

/// What happens to replies still in flight when the transcript is reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyPolicy {
    /// Abort pending replies; late arrivals from an older epoch are dropped
    #[default]
    Cancel,
    /// Let stale replies land in whatever transcript exists when they fire
    Keep,
}

impl ReplyPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cancel" => Some(ReplyPolicy::Cancel),
            "keep" => Some(ReplyPolicy::Keep),
            _ => None,
        }
    }
}

/// A simulated reply owed for a user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    /// The user turn that triggered the reply
    pub turn: TurnId,
    /// Text of that user turn; feedback is computed from it
    pub text: String,
    /// Mood selected when the message was sent
    pub mood: Tone,
    /// Reset epoch at send time
    pub epoch: u64,
}

pub fn reply_text(mood: Tone) -> String {
    format!(
        "{} response: (simulated) — I hear you. Could you clarify what outcome you want?",
        mood
    )
}

/// Fields of a custom scenario that has not been submitted yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioDraft {
    pub title: String,
    pub description: String,
    pub script: String,
}

impl ScenarioDraft {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.script.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    store: ScenarioStore,
    active_id: String,
    transcript: Vec<ChatTurn>,
    feedback: Option<FeedbackRecord>,
    next_turn: u64,
    epoch: u64,
    policy: ReplyPolicy,

    pub draft: String,
    pub mood: Tone,
    pub scenario_draft: ScenarioDraft,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tone::default(), ReplyPolicy::default())
    }
}

impl Session {
    pub fn new(mood: Tone, policy: ReplyPolicy) -> Self {
        let store = ScenarioStore::new();
        let active_id = store.first().id.clone();
        Self {
            store,
            active_id,
            transcript: Vec::new(),
            feedback: None,
            next_turn: 0,
            epoch: 0,
            policy,
            draft: String::new(),
            mood,
            scenario_draft: ScenarioDraft::default(),
        }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        self.store.all()
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active scenario, falling back to the first one if the id is unknown
    pub fn active_scenario(&self) -> &Scenario {
        self.store
            .get(&self.active_id)
            .unwrap_or_else(|| self.store.first())
    }

    /// Index of the scenario actually shown, after fallback
    pub fn active_index(&self) -> usize {
        self.store.position(&self.active_id).unwrap_or(0)
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn feedback(&self) -> Option<&FeedbackRecord> {
        self.feedback.as_ref()
    }

    pub fn policy(&self) -> ReplyPolicy {
        self.policy
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn reset_conversation(&mut self) {
        self.transcript.clear();
        self.feedback = None;
        self.epoch += 1;
    }

    fn push_turn(&mut self, from: Speaker, text: String) -> TurnId {
        let id = TurnId(self.next_turn);
        self.next_turn += 1;
        self.transcript.push(ChatTurn { id, from, text });
        id
    }

    /// Switch to `id` and clear the conversation. Unknown ids are accepted;
    /// reads fall back to the first scenario.
    pub fn select_scenario(&mut self, id: &str) {
        info!(scenario = id, "Selecting scenario");
        self.active_id = id.to_string();
        self.reset_conversation();
    }

    /// Add a custom scenario and make it active. Blank titles are ignored.
    pub fn add_scenario(&mut self, title: &str, description: &str, script: &str) -> Option<String> {
        let id = self.store.add(title, description, script)?.id.clone();
        info!(scenario = %id, "Added custom scenario");
        self.active_id = id.clone();
        self.reset_conversation();
        Some(id)
    }

    /// Submit the scenario draft; the draft is cleared only on success
    pub fn submit_scenario_draft(&mut self) -> Option<String> {
        let ScenarioDraft { title, description, script } = self.scenario_draft.clone();
        let id = self.add_scenario(&title, &description, &script)?;
        self.scenario_draft.clear();
        Some(id)
    }

    /// Append a user turn. Returns the reply the caller should schedule, or
    /// `None` when the text is blank.
    pub fn send_message(&mut self, text: &str) -> Option<ReplyRequest> {
        if text.trim().is_empty() {
            return None;
        }

        let turn = self.push_turn(Speaker::User, text.to_string());
        self.draft.clear();
        debug!(turn = turn.0, "User turn appended");

        Some(ReplyRequest {
            turn,
            text: text.to_string(),
            mood: self.mood,
            epoch: self.epoch,
        })
    }

    pub fn send_draft(&mut self) -> Option<ReplyRequest> {
        let text = self.draft.clone();
        self.send_message(&text)
    }

    /// Land a simulated reply. Under `ReplyPolicy::Cancel` a reply from an
    /// earlier epoch is dropped and `false` is returned.
    pub fn deliver_reply<S: FeedbackSource + ?Sized>(
        &mut self,
        reply: &ReplyRequest,
        source: &mut S,
    ) -> bool {
        if self.policy == ReplyPolicy::Cancel && reply.epoch != self.epoch {
            debug!(turn = reply.turn.0, "Dropping reply from before reset");
            return false;
        }

        let id = self.push_turn(Speaker::Ai, reply_text(reply.mood));
        self.feedback = Some(analyze(&reply.text, source));
        debug!(turn = reply.turn.0, reply_turn = id.0, "AI turn appended");
        true
    }

    /// Copy the active scenario's script into the draft input, if it has one
    pub fn use_script(&mut self) {
        let script = self.active_scenario().script.clone();
        if !script.is_empty() {
            self.draft = script;
        }
    }

    pub fn set_mood(&mut self, mood: Tone) {
        self.mood = mood;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::tests::FixedSource;
    use crate::feedback::{RECOMMEND_EXAMPLE, RECOMMEND_PREVENTION};

    fn source() -> FixedSource {
        FixedSource { tone: Tone::Calm, scores: vec![75] }
    }

    fn session_with_feedback() -> Session {
        let mut session = Session::default();
        let reply = session.send_message("hi").unwrap();
        assert!(session.deliver_reply(&reply, &mut source()));
        session
    }

    #[test]
    fn test_starts_on_first_default() {
        let session = Session::default();
        assert_eq!(session.active_id(), "apologize");
        assert!(session.transcript().is_empty());
        assert!(session.feedback().is_none());
        assert_eq!(session.mood, Tone::Calm);
    }

    #[test]
    fn test_add_scenario_grows_store_and_activates() {
        let mut session = session_with_feedback();
        let id = session.add_scenario("Difficult Talk", "With a roommate", "").unwrap();
        assert_eq!(session.scenarios().len(), 4);
        assert_eq!(session.active_id(), id);
        assert_eq!(session.active_scenario().title, "Difficult Talk");
        assert!(session.transcript().is_empty());
        assert!(session.feedback().is_none());
    }

    #[test]
    fn test_add_blank_scenario_changes_nothing() {
        let mut session = session_with_feedback();
        assert!(session.add_scenario("  ", "desc", "script").is_none());
        assert_eq!(session.scenarios().len(), 3);
        assert_eq!(session.active_id(), "apologize");
        assert_eq!(session.transcript().len(), 2);
        assert!(session.feedback().is_some());
    }

    #[test]
    fn test_submit_draft_clears_fields_only_on_success() {
        let mut session = Session::default();
        session.scenario_draft.description = "kept".to_string();
        assert!(session.submit_scenario_draft().is_none());
        assert_eq!(session.scenario_draft.description, "kept");

        session.scenario_draft.title = "Saying no".to_string();
        session.scenario_draft.script = "No, thank you.".to_string();
        let id = session.submit_scenario_draft().unwrap();
        assert!(id.starts_with("saying-no-"));
        assert_eq!(session.active_scenario().script, "No, thank you.");
        assert_eq!(session.scenario_draft, ScenarioDraft::default());
    }

    #[test]
    fn test_two_scenarios_same_title_distinct_ids() {
        let mut session = Session::default();
        let a = session.add_scenario("Repeat", "", "").unwrap();
        let b = session.add_scenario("Repeat", "", "").unwrap();
        assert_ne!(a, b);
        assert_eq!(session.scenarios().len(), 5);
    }

    #[test]
    fn test_select_clears_conversation() {
        let mut session = session_with_feedback();
        session.select_scenario("promotion");
        assert_eq!(session.active_scenario().id, "promotion");
        assert!(session.transcript().is_empty());
        assert!(session.feedback().is_none());

        // Already empty: still a reset
        let epoch = session.epoch();
        session.select_scenario("promotion");
        assert_eq!(session.epoch(), epoch + 1);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_unknown_id_falls_back_to_first() {
        let mut session = Session::default();
        session.select_scenario("does-not-exist");
        assert_eq!(session.active_id(), "does-not-exist");
        assert_eq!(session.active_scenario().id, "apologize");
        assert_eq!(session.active_index(), 0);
    }

    #[test]
    fn test_send_blank_is_noop() {
        let mut session = Session::default();
        session.draft = "   ".to_string();
        assert!(session.send_draft().is_none());
        assert!(session.send_message("").is_none());
        assert!(session.transcript().is_empty());
        assert_eq!(session.draft, "   ");
    }

    #[test]
    fn test_send_appends_user_turn_and_clears_draft() {
        let mut session = Session::default();
        session.draft = "hi".to_string();
        let reply = session.send_draft().unwrap();
        assert!(session.draft.is_empty());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].from, Speaker::User);
        assert_eq!(session.transcript()[0].text, "hi");
        assert_eq!(reply.turn, session.transcript()[0].id);
        assert!(session.feedback().is_none());
    }

    #[test]
    fn test_reply_follows_user_turn() {
        let mut session = Session::default();
        let reply = session.send_message("hi").unwrap();
        assert!(session.deliver_reply(&reply, &mut source()));

        let turns = session.transcript();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].from, Speaker::User);
        assert_eq!(turns[1].from, Speaker::Ai);
        assert!(turns[0].id < turns[1].id);
        let feedback = session.feedback().unwrap();
        assert_eq!(feedback.recommendations, vec![RECOMMEND_EXAMPLE.to_string()]);
    }

    #[test]
    fn test_feedback_uses_triggering_text() {
        let mut session = Session::default();
        let first = session.send_message("sorry about that").unwrap();
        let second = session.send_message("A much longer message that talks about the weekend plans").unwrap();

        session.deliver_reply(&first, &mut source());
        let feedback = session.feedback().unwrap();
        assert!(feedback.recommendations.contains(&RECOMMEND_PREVENTION.to_string()));

        session.deliver_reply(&second, &mut source());
        let feedback = session.feedback().unwrap();
        assert!(!feedback.recommendations.contains(&RECOMMEND_PREVENTION.to_string()));

        // user, user, ai, ai
        let speakers: Vec<Speaker> = session.transcript().iter().map(|t| t.from).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::User, Speaker::Ai, Speaker::Ai]);
    }

    #[test]
    fn test_reply_carries_mood_at_send_time() {
        let mut session = Session::default();
        session.set_mood(Tone::Assertive);
        let reply = session.send_message("hello there").unwrap();
        session.set_mood(Tone::Friendly);
        session.deliver_reply(&reply, &mut source());
        assert_eq!(session.transcript()[1].text, reply_text(Tone::Assertive));
        assert!(session.transcript()[1].text.starts_with("Assertive response:"));
    }

    #[test]
    fn test_cancel_policy_drops_stale_reply() {
        let mut session = Session::new(Tone::Calm, ReplyPolicy::Cancel);
        let reply = session.send_message("hi").unwrap();
        session.select_scenario("rejection");
        assert!(!session.deliver_reply(&reply, &mut source()));
        assert!(session.transcript().is_empty());
        assert!(session.feedback().is_none());
    }

    #[test]
    fn test_keep_policy_lands_stale_reply() {
        let mut session = Session::new(Tone::Calm, ReplyPolicy::Keep);
        let reply = session.send_message("hi").unwrap();
        session.select_scenario("rejection");
        assert!(session.deliver_reply(&reply, &mut source()));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].from, Speaker::Ai);
        assert!(session.feedback().is_some());
    }

    #[test]
    fn test_use_script_copies_non_empty_script() {
        let mut session = Session::default();
        session.use_script();
        assert!(session.draft.starts_with("Hi [friend]"));

        session.add_scenario("No script", "", "");
        session.draft = "typed".to_string();
        session.use_script();
        assert_eq!(session.draft, "typed");
    }

    #[test]
    fn test_reply_policy_parsing() {
        assert_eq!(ReplyPolicy::from_str("Keep"), Some(ReplyPolicy::Keep));
        assert_eq!(ReplyPolicy::from_str("cancel"), Some(ReplyPolicy::Cancel));
        assert_eq!(ReplyPolicy::from_str("drop"), None);
    }
}
