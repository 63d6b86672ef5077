//! Battle-pass progress projection
//!
//! Owns the season reward catalog, the claimed-day set, and the current
//! season day, and derives per-reward display state on demand. Server
//! merges are monotonic: the current day never decreases and claimed days
//! are never removed, so a stale poll arriving late cannot undo a newer
//! successful claim.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use webshop_core::{
    ClaimResponse, Error, PassPurchaseResponse, ProgressPayload, Result, RewardEntry, RewardKind,
    SeasonPayload, DAYS_PER_WEEK, SEASON_DAYS, SEASON_WEEKS,
};

/// Button state for one reward tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardButton {
    /// Already claimed
    Claimed,
    /// Claimable right now
    Claim,
    /// Day not reached yet
    Locked,
    /// No character selected, claiming is impossible
    NoCharacter,
}

/// One reward tile, fully derived for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardView {
    pub day: u32,
    pub name: String,
    pub kind: RewardKind,
    pub value: u32,
    pub icon: Option<String>,
    pub description: String,
    /// "Day N"
    pub label: String,
    /// e.g. "Elixir x5" or "100 pts"
    pub value_text: String,
    pub claimed: bool,
    pub claimable: bool,
    pub locked: bool,
    pub button: RewardButton,
}

/// One week page of reward tiles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub week: u32,
    pub days: Vec<RewardView>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Aggregate progress numbers for the header area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub current_day: u32,
    pub claimed_count: u32,
    /// Whether today's reward is still unclaimed
    pub available_today: bool,
    pub streak: u32,
    /// Season completion, 0..=100
    pub progress_percent: u32,
}

/// Battle-pass domain state for one session
#[derive(Debug)]
pub struct ProgressProjection {
    rewards: Vec<RewardEntry>,
    season_name: Option<String>,
    season_end: Option<NaiveDateTime>,
    /// Pass expiry as the server formats it, set after a pass purchase
    pass_expiry: Option<String>,
    current_day: u32,
    claimed_days: BTreeSet<u32>,
    /// View cursor only, never touched by server merges
    week: u32,
    version: u64,
}

impl ProgressProjection {
    pub fn new() -> Self {
        Self {
            rewards: Vec::new(),
            season_name: None,
            season_end: None,
            pass_expiry: None,
            current_day: 1,
            claimed_days: BTreeSet::new(),
            week: 1,
            version: 0,
        }
    }

    // ─── Server merges ───────────────────────────────────────────────

    /// Replace the reward catalog and season metadata from a season
    /// document. A document without a reward list is malformed and the
    /// previous catalog stays in place, never a partial clear.
    pub fn load_catalog(&mut self, payload: SeasonPayload) -> Result<()> {
        let Some(rewards) = payload.rewards else {
            return Err(Error::MalformedPayload(
                "season document has no reward list".to_string(),
            ));
        };

        let mut rewards: Vec<RewardEntry> = rewards.into_iter().map(RewardEntry::from).collect();
        rewards.sort_by_key(|r| r.day);

        self.rewards = rewards;
        self.season_name = payload.name;
        self.season_end = payload.end_date.as_deref().and_then(parse_server_date);
        self.version += 1;
        Ok(())
    }

    /// Merge a progress poll. Both fields land together or not at all;
    /// the merge never lowers the day or drops a claimed day.
    pub fn load_progress(&mut self, payload: ProgressPayload) -> Result<()> {
        let Some(data) = payload.data else {
            return Err(Error::MalformedPayload(
                "progress response has no data field".to_string(),
            ));
        };

        self.merge_progress(data.current_day, &data.claimed_days);
        Ok(())
    }

    /// Merge a successful claim response for `day`. Unsuccessful
    /// responses leave the projection untouched; the caller surfaces the
    /// server's message.
    pub fn apply_claim(&mut self, day: u32, resp: &ClaimResponse) {
        if !resp.success {
            return;
        }

        self.merge_progress(resp.day.unwrap_or(0), &resp.claimed_days);

        // The server may correct the claimed tile's item data
        if let Some(entry) = self.rewards.iter_mut().find(|r| r.day == day) {
            if let Some(name) = &resp.item_name {
                entry.name = name.clone();
            }
            if let Some(icon) = &resp.icon {
                entry.icon = Some(icon.clone());
            }
            if let Some(amount) = resp.amount {
                entry.value = amount;
            }
        }
    }

    /// Record a successful pass purchase
    pub fn apply_pass_purchase(&mut self, resp: &PassPurchaseResponse) {
        if !resp.success {
            return;
        }
        self.pass_expiry = resp.expiry_date.clone();
        self.version += 1;
    }

    /// Monotonic merge. Claimed days stay within the season; the day is
    /// raised to cover every claimed day so claimed ⊆ [1, current_day].
    fn merge_progress(&mut self, server_day: u32, claimed: &[u32]) {
        self.current_day = self.current_day.max(server_day).max(1);
        self.claimed_days.extend(
            claimed
                .iter()
                .copied()
                .filter(|d| (1..=SEASON_DAYS).contains(d)),
        );
        if let Some(&top) = self.claimed_days.iter().next_back() {
            self.current_day = self.current_day.max(top);
        }
        self.version += 1;
    }

    // ─── Week cursor ─────────────────────────────────────────────────

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn next_week(&mut self) {
        if self.week < SEASON_WEEKS {
            self.week += 1;
        }
    }

    pub fn prev_week(&mut self) {
        if self.week > 1 {
            self.week -= 1;
        }
    }

    pub fn set_week(&mut self, week: u32) {
        self.week = week.clamp(1, SEASON_WEEKS);
    }

    // ─── Derivations ─────────────────────────────────────────────────

    /// Derive the reward tiles of the week the cursor points at
    pub fn derive_week_view(&self, has_character: bool) -> WeekView {
        self.derive_week(self.week, has_character)
    }

    /// Derive one week's reward tiles, days `[(w-1)*7+1, min(w*7, 30)]`
    /// in day order.
    ///
    /// Each tile is exactly one of claimed/claimable/locked. When no
    /// character is selected an override runs after that computation:
    /// the tile is forced locked and unclaimable with its own button
    /// state, while an already-claimed tile keeps its claimed flag.
    pub fn derive_week(&self, week: u32, has_character: bool) -> WeekView {
        let week = week.clamp(1, SEASON_WEEKS);
        let start = (week - 1) * DAYS_PER_WEEK + 1;
        let end = (start + DAYS_PER_WEEK - 1).min(SEASON_DAYS);

        let days = self
            .rewards
            .iter()
            .filter(|r| (start..=end).contains(&r.day))
            .map(|r| self.derive_reward(r, has_character))
            .collect();

        WeekView {
            week,
            days,
            has_prev: week > 1,
            has_next: week < SEASON_WEEKS,
        }
    }

    fn derive_reward(&self, entry: &RewardEntry, has_character: bool) -> RewardView {
        let claimed = self.claimed_days.contains(&entry.day);
        let claimable = entry.day <= self.current_day && !claimed;
        let locked = entry.day > self.current_day;

        let button = if claimed {
            RewardButton::Claimed
        } else if claimable {
            RewardButton::Claim
        } else {
            RewardButton::Locked
        };

        let mut view = RewardView {
            day: entry.day,
            name: entry.name.clone(),
            kind: entry.kind,
            value: entry.value,
            icon: entry.icon.clone(),
            description: entry.description.clone(),
            label: format!("Day {}", entry.day),
            value_text: value_text(entry),
            claimed,
            claimable,
            locked,
            button,
        };

        if !has_character {
            view.claimable = false;
            view.locked = true;
            view.button = RewardButton::NoCharacter;
        }

        view
    }

    /// Contiguous run of claimed days ending at `current_day - 1`,
    /// walking backward
    pub fn streak(&self) -> u32 {
        let mut streak = 0;
        let mut expected = self.current_day.saturating_sub(1);
        while expected >= 1 && self.claimed_days.contains(&expected) {
            streak += 1;
            expected -= 1;
        }
        streak
    }

    pub fn stats(&self) -> ProgressStats {
        ProgressStats {
            current_day: self.current_day,
            claimed_count: self.claimed_days.len() as u32,
            available_today: self.current_day >= 1
                && self.current_day <= SEASON_DAYS
                && !self.claimed_days.contains(&self.current_day),
            streak: self.streak(),
            progress_percent: ((self.current_day as f64 / SEASON_DAYS as f64) * 100.0).round()
                as u32,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn claimed_days(&self) -> &BTreeSet<u32> {
        &self.claimed_days
    }

    pub fn season_name(&self) -> Option<&str> {
        self.season_name.as_deref()
    }

    pub fn season_end(&self) -> Option<NaiveDateTime> {
        self.season_end
    }

    pub fn pass_expiry(&self) -> Option<&str> {
        self.pass_expiry.as_deref()
    }

    pub fn has_catalog(&self) -> bool {
        !self.rewards.is_empty()
    }

    /// Counts server-state merges; the scheduler compares it around a
    /// fetch to spot results that went stale in flight
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for ProgressProjection {
    fn default() -> Self {
        Self::new()
    }
}

fn value_text(entry: &RewardEntry) -> String {
    if !entry.name.is_empty() {
        format!("{} x{}", entry.name, entry.value)
    } else {
        match entry.kind {
            RewardKind::Points => format!("{} pts", entry.value),
            RewardKind::Cash => format!("{} cash", entry.value),
            RewardKind::Item => format!("Item x{}", entry.value),
        }
    }
}

/// Dates arrive in whatever format the server side happens to emit
fn parse_server_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
