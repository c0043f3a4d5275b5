//! In-memory store for challenges, meetups, and the reward ledger.
//!
//! Everything here lives for the process lifetime only.  Handlers reach the store through
//! the volatile state lock; the store itself is plain data and synchronous, so no lock is
//! ever held across a suspension point.

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;
use serenity::all::UserId;
use std::collections::HashMap;

/// How many entries the leaderboard shows.
pub const LEADERBOARD_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChallengeId(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeetupId(u16);

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MeetupId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ChallengeId {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }
}

impl MeetupId {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }
}

/// A long-running group activity with participants and freeform progress notes.
pub struct Challenge {
    pub id: ChallengeId,
    pub creator: UserId,
    pub name: String,
    pub description: String,
    pub duration_hours: u32,
    pub started_at: DateTime<Utc>,
    pub completed: bool,
    /// Participants in join order.  The creator is always first.
    pub participants: Vec<UserId>,
    pub reviews: Vec<String>,
    pub milestones: Vec<String>,
}

/// A scheduled group gathering.
pub struct Meetup {
    pub id: MeetupId,
    pub organizer: UserId,
    pub topic: String,
    pub scheduled_at: NaiveDateTime,
    /// Attendees in join order.  The organizer is always first.
    pub attendees: Vec<UserId>,
}

struct RewardEntry {
    user: UserId,
    score: u64,
    last_claim: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no challenge with id {0}")]
    ChallengeNotFound(ChallengeId),
    #[error("no meetup with id {0}")]
    MeetupNotFound(MeetupId),
    #[error("user already participates in this challenge")]
    AlreadyJoined,
    #[error("user already attends this meetup")]
    AlreadyAttending,
    #[error("daily reward already claimed")]
    AlreadyClaimed,
}

/// The store behind every domain command.  Challenges and meetups are kept in insertion
/// order; the per-user indices are maintained in lockstep with the participant and
/// attendee lists.
pub struct Store {
    challenges: Vec<Challenge>,
    meetups: Vec<Meetup>,
    participation: HashMap<UserId, Vec<ChallengeId>>,
    attendance: HashMap<UserId, Vec<MeetupId>>,
    /// Insertion order doubles as the leaderboard tie-break.
    rewards: Vec<RewardEntry>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            challenges: Vec::new(),
            meetups: Vec::new(),
            participation: HashMap::new(),
            attendance: HashMap::new(),
            rewards: Vec::new(),
        }
    }

    // Ids are displayed as 4-digit numbers.  Allocation retries until the id is unused
    // among live entries, so uniqueness does not rest on luck.
    fn fresh_challenge_id(&self) -> ChallengeId {
        let mut rng = rand::thread_rng();
        loop {
            let id = ChallengeId(rng.gen_range(1000..=9999));
            if self.challenge(id).is_none() {
                return id;
            }
        }
    }

    fn fresh_meetup_id(&self) -> MeetupId {
        let mut rng = rand::thread_rng();
        loop {
            let id = MeetupId(rng.gen_range(1000..=9999));
            if self.meetup(id).is_none() {
                return id;
            }
        }
    }

    pub fn create_challenge(
        &mut self,
        creator: UserId,
        name: String,
        description: String,
        duration_hours: u32,
        now: DateTime<Utc>,
    ) -> ChallengeId {
        let id = self.fresh_challenge_id();
        self.challenges.push(Challenge {
            id,
            creator,
            name,
            description,
            duration_hours,
            started_at: now,
            completed: false,
            participants: vec![creator],
            reviews: Vec::new(),
            milestones: Vec::new(),
        });
        self.participation.entry(creator).or_default().push(id);
        id
    }

    pub fn challenge(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    fn challenge_mut(&mut self, id: ChallengeId) -> Result<&mut Challenge, StoreError> {
        self.challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ChallengeNotFound(id))
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn join_challenge(&mut self, id: ChallengeId, user: UserId) -> Result<&Challenge, StoreError> {
        let challenge = self
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ChallengeNotFound(id))?;

        if challenge.participants.contains(&user) {
            return Err(StoreError::AlreadyJoined);
        }

        challenge.participants.push(user);
        self.participation.entry(user).or_default().push(id);
        Ok(&*challenge)
    }

    pub fn complete_challenge(&mut self, id: ChallengeId) -> Result<&Challenge, StoreError> {
        let challenge = self.challenge_mut(id)?;
        challenge.completed = true;
        Ok(&*challenge)
    }

    pub fn add_review(&mut self, id: ChallengeId, review: String) -> Result<&Challenge, StoreError> {
        let challenge = self.challenge_mut(id)?;
        challenge.reviews.push(review);
        Ok(&*challenge)
    }

    pub fn add_milestone(
        &mut self,
        id: ChallengeId,
        milestone: String,
    ) -> Result<&Challenge, StoreError> {
        let challenge = self.challenge_mut(id)?;
        challenge.milestones.push(milestone);
        Ok(&*challenge)
    }

    pub fn create_meetup(
        &mut self,
        organizer: UserId,
        topic: String,
        scheduled_at: NaiveDateTime,
    ) -> MeetupId {
        let id = self.fresh_meetup_id();
        self.meetups.push(Meetup {
            id,
            organizer,
            topic,
            scheduled_at,
            attendees: vec![organizer],
        });
        self.attendance.entry(organizer).or_default().push(id);
        id
    }

    pub fn meetup(&self, id: MeetupId) -> Option<&Meetup> {
        self.meetups.iter().find(|m| m.id == id)
    }

    pub fn meetups(&self) -> &[Meetup] {
        &self.meetups
    }

    pub fn join_meetup(&mut self, id: MeetupId, user: UserId) -> Result<&Meetup, StoreError> {
        let meetup = self
            .meetups
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MeetupNotFound(id))?;

        if meetup.attendees.contains(&user) {
            return Err(StoreError::AlreadyAttending);
        }

        meetup.attendees.push(user);
        self.attendance.entry(user).or_default().push(id);
        Ok(&*meetup)
    }

    /// Record a daily claim of `amount` points.  A claim is blocked until a full day has
    /// elapsed since the user's previous claim; the window is not midnight-aligned.
    /// Returns the user's new total.
    pub fn claim_daily(
        &mut self,
        user: UserId,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        match self.rewards.iter_mut().find(|e| e.user == user) {
            Some(entry) => {
                if (now - entry.last_claim).num_days() == 0 {
                    return Err(StoreError::AlreadyClaimed);
                }
                entry.last_claim = now;
                entry.score += amount;
                Ok(entry.score)
            }
            None => {
                self.rewards.push(RewardEntry {
                    user,
                    score: amount,
                    last_claim: now,
                });
                Ok(amount)
            }
        }
    }

    /// Top scores, highest first.  Equal scores keep first-claim order.
    pub fn leaderboard(&self) -> Vec<(UserId, u64)> {
        let mut entries: Vec<(UserId, u64)> = self
            .rewards
            .iter()
            .map(|entry| (entry.user, entry.score))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(LEADERBOARD_LIMIT);
        entries
    }

    /// (challenges joined, meetups attended) for one user, from the indices alone.
    pub fn stats(&self, user: UserId) -> (usize, usize) {
        let challenges = self.participation.get(&user).map_or(0, Vec::len);
        let meetups = self.attendance.get(&user).map_or(0, Vec::len);
        (challenges, meetups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn user(raw: u64) -> UserId {
        UserId::new(raw)
    }

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    fn sample_challenge(store: &mut Store, creator: UserId) -> ChallengeId {
        store.create_challenge(
            creator,
            "rust-study".into(),
            "weekly reading".into(),
            48,
            now(),
        )
    }

    #[test]
    fn create_challenge_assigns_unique_ids_and_joins_creator() {
        let mut store = Store::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let id = sample_challenge(&mut store, user(1));
            assert!(seen.insert(id), "id {id} issued twice");

            let challenge = store.challenge(id).unwrap();
            assert_eq!(challenge.participants, vec![user(1)]);
            assert_eq!(challenge.started_at, now());
            assert!(!challenge.completed);
        }
        assert_eq!(store.stats(user(1)).0, 50);
    }

    #[test]
    fn join_challenge_twice_reports_already_joined_without_duplicates() {
        let mut store = Store::new();
        let id = sample_challenge(&mut store, user(1));

        assert!(store.join_challenge(id, user(2)).is_ok());
        assert_eq!(
            store.join_challenge(id, user(2)).err(),
            Some(StoreError::AlreadyJoined)
        );

        let challenge = store.challenge(id).unwrap();
        assert_eq!(challenge.participants, vec![user(1), user(2)]);
        assert_eq!(store.stats(user(2)), (1, 0));
    }

    #[test]
    fn join_unknown_challenge_mutates_nothing() {
        let mut store = Store::new();
        let missing = ChallengeId::new(1234);
        assert!(matches!(
            store.join_challenge(missing, user(2)),
            Err(StoreError::ChallengeNotFound(id)) if id == missing,
        ));
        assert_eq!(store.stats(user(2)), (0, 0));
        assert!(store.challenges().is_empty());
    }

    #[test]
    fn index_matches_participant_lists_both_ways() {
        let mut store = Store::new();
        let a = sample_challenge(&mut store, user(1));
        let b = sample_challenge(&mut store, user(2));
        store.join_challenge(b, user(1)).unwrap();

        // every indexed id lists the user, and vice versa
        for (id, who) in [(a, user(1)), (b, user(1)), (b, user(2))] {
            assert!(store.challenge(id).unwrap().participants.contains(&who));
        }
        assert_eq!(store.stats(user(1)).0, 2);
        assert_eq!(store.stats(user(2)).0, 1);
    }

    #[test]
    fn meetups_mirror_challenge_behavior() {
        let mut store = Store::new();
        let when = "2025-07-01T18:30:00"
            .parse::<NaiveDateTime>()
            .unwrap();
        let id = store.create_meetup(user(1), "rustconf watch party".into(), when);

        assert_eq!(store.meetup(id).unwrap().attendees, vec![user(1)]);
        assert!(store.join_meetup(id, user(2)).is_ok());
        assert_eq!(
            store.join_meetup(id, user(2)).err(),
            Some(StoreError::AlreadyAttending)
        );
        assert!(matches!(
            store.join_meetup(MeetupId::new(4321), user(3)),
            Err(StoreError::MeetupNotFound(_)),
        ));
        assert_eq!(store.stats(user(2)), (0, 1));
    }

    #[test]
    fn second_claim_within_a_day_is_rejected() {
        let mut store = Store::new();
        let t0 = now();

        assert_eq!(store.claim_daily(user(1), 100, t0), Ok(100));
        assert_eq!(
            store.claim_daily(user(1), 100, t0 + TimeDelta::hours(23)).err(),
            Some(StoreError::AlreadyClaimed)
        );
        // The window is elapsed time, not a calendar boundary.
        assert_eq!(
            store.claim_daily(user(1), 250, t0 + TimeDelta::hours(25)),
            Ok(350)
        );
    }

    #[test]
    fn leaderboard_is_capped_sorted_and_tie_stable() {
        let mut store = Store::new();
        let scores = [500u64, 100, 250, 100, 500, 250, 100];
        for (i, score) in scores.iter().enumerate() {
            store.claim_daily(user(i as u64 + 1), *score, now()).unwrap();
        }

        let board = store.leaderboard();
        assert_eq!(board.len(), LEADERBOARD_LIMIT);
        assert_eq!(
            board,
            vec![
                (user(1), 500),
                (user(5), 500),
                (user(3), 250),
                (user(6), 250),
                (user(2), 100),
            ]
        );
    }

    #[test]
    fn stats_counts_challenges_and_meetups() {
        let mut store = Store::new();
        let a = sample_challenge(&mut store, user(1));
        let b = sample_challenge(&mut store, user(1));
        let when = "2025-07-01T18:30:00".parse::<NaiveDateTime>().unwrap();
        let m = store.create_meetup(user(9), "lightning talks".into(), when);

        store.join_challenge(a, user(5)).unwrap();
        store.join_challenge(b, user(5)).unwrap();
        store.join_meetup(m, user(5)).unwrap();

        assert_eq!(store.stats(user(5)), (2, 1));
    }

    #[test]
    fn progress_notes_append_in_order() {
        let mut store = Store::new();
        let id = sample_challenge(&mut store, user(1));

        store.add_milestone(id, "week one done".into()).unwrap();
        store.add_review(id, "good pace so far".into()).unwrap();
        store.add_milestone(id, "week two done".into()).unwrap();

        let challenge = store.challenge(id).unwrap();
        assert_eq!(challenge.milestones, vec!["week one done", "week two done"]);
        assert_eq!(challenge.reviews, vec!["good pace so far"]);

        let done = store.complete_challenge(id).unwrap();
        assert!(done.completed);
    }
}
