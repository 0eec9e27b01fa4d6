//! Conversation lifecycle simulator.
//!
//! Owns the in-memory message sequence of one open conversation and drives
//! its time-based transitions: delivery status, simulated replies, one-time
//! media expiry, ephemeral removal and the ambient typing indicator.
//!
//! Pure state machine in the action pattern: user operations and
//! [`Conversation::handle_tick`] take the current instant and return
//! [`ConversationAction`]s for the caller to execute. Nothing here sleeps or
//! reads a clock. An empty action list means the call changed nothing.
//!
//! # Fail-soft
//!
//! Unknown message ids, empty sends and stale scheduled transitions are
//! silent no-ops. Every scheduled transition re-checks the current state
//! before writing, so a late task can neither resurrect a removed message nor
//! move a status backwards.
//!
//! # Lifetime
//!
//! [`Conversation::teardown`] cancels every pending task. After teardown all
//! operations and ticks are no-ops.

use std::{collections::BTreeSet, time::Duration};

use tracing::{debug, info, trace};

use crate::{
    ContactDirectory, ContactId, ContactProfile, DeliveryStatus, FilePicker, Media, MediaLocator,
    Message, MessageId, MessageSeed, Notification, Sender, SimulationConfig,
    env::{Deadline, Environment},
    schedule::{TaskKind, TaskRegistry},
};

/// Title of the notification raised when one-time media expires.
pub const MEDIA_EXPIRED_TITLE: &str = "Media expired";

/// Description of the notification raised when one-time media expires.
pub const MEDIA_EXPIRED_DESCRIPTION: &str = "The one-time view media has expired";

/// Actions returned by the conversation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationAction {
    /// Visible state changed.
    Render,
    /// Show a transient notification.
    Notify(Notification),
}

/// What the conversation view displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationView {
    /// Contact found, conversation loaded.
    Open {
        /// Profile of the contact.
        profile: ContactProfile,
    },
    /// No profile for the requested contact. Terminal.
    NotFound,
}

/// Reason the typing indicator is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypingSource {
    /// A scheduled reply is being "typed".
    Reply(u64),
    /// Ambient typing burst.
    Ambient,
}

/// One open conversation.
///
/// Generic over the environment so simulation can drive it with virtual
/// time and a seeded RNG.
#[derive(Debug, Clone)]
pub struct Conversation<E: Environment> {
    /// Randomness and wall clock
    env: E,
    /// Delays and probabilities
    config: SimulationConfig,
    /// Contact this conversation is with
    contact_id: ContactId,
    /// Open or not-found
    view: ConversationView,
    /// Messages in chronological order
    messages: Vec<Message>,
    /// Active typing sources. Indicator shown while non-empty
    typing: BTreeSet<TypingSource>,
    /// Pending scheduled transitions
    tasks: TaskRegistry<E::Instant>,
    /// Counter for locally sent message ids
    next_local: u64,
    /// Counter for scheduled replies (task keys)
    next_reply: u64,
    /// Counter for reply message ids
    next_reply_message: u64,
    /// Set by teardown
    torn_down: bool,
}

impl<E: Environment> Conversation<E> {
    /// Load the conversation with `contact_id`.
    ///
    /// Without a profile the conversation is [`ConversationView::NotFound`],
    /// empty and schedules nothing. Otherwise messages come from `seed` in
    /// their given order, each ephemeral message gets its expiry scheduled
    /// and the ambient typing simulation starts.
    pub fn open(
        contact_id: ContactId,
        directory: &(impl ContactDirectory + ?Sized),
        seed: &(impl MessageSeed + ?Sized),
        env: E,
        config: SimulationConfig,
        now: E::Instant,
    ) -> Self {
        let mut conversation = Self {
            env,
            config,
            contact_id,
            view: ConversationView::NotFound,
            messages: Vec::new(),
            typing: BTreeSet::new(),
            tasks: TaskRegistry::new(),
            next_local: 1,
            next_reply: 1,
            next_reply_message: 1,
            torn_down: false,
        };

        let Some(profile) = directory.profile(&conversation.contact_id) else {
            info!(contact = %conversation.contact_id, "conversation not found");
            return conversation;
        };

        conversation.view = ConversationView::Open { profile };
        conversation.messages =
            seed.seed(&conversation.contact_id, conversation.env.wall_clock_millis());

        let default_ttl = conversation.config.default_ephemeral_ttl;
        let expiries: Vec<(MessageId, Duration)> = conversation
            .messages
            .iter()
            .filter_map(|m| m.ttl(default_ttl).map(|ttl| (m.id.clone(), ttl)))
            .collect();
        for (id, ttl) in expiries {
            conversation.schedule_after(now, ttl, TaskKind::ExpireEphemeral(id));
        }

        let interval = conversation.config.ambient_interval();
        conversation.schedule_after(now, interval, TaskKind::AmbientTyping);

        info!(
            contact = %conversation.contact_id,
            messages = conversation.messages.len(),
            "conversation opened"
        );
        conversation
    }

    /// Send a message from the local user.
    ///
    /// No-op when `content` is blank and there is no media. The message
    /// starts as sent and is scheduled to become delivered and then read. A
    /// reply from the peer is scheduled with the configured probability.
    pub fn send(
        &mut self,
        content: &str,
        media: Option<Media>,
        now: E::Instant,
    ) -> Vec<ConversationAction> {
        self.submit(content, media, None, now)
    }

    /// Send a message that disappears after `ttl`.
    pub fn send_ephemeral(
        &mut self,
        content: &str,
        media: Option<Media>,
        ttl: Duration,
        now: E::Instant,
    ) -> Vec<ConversationAction> {
        self.submit(content, media, Some(ttl), now)
    }

    /// Send whatever `picker` yields as an image with empty content.
    ///
    /// No-op when the picker yields nothing.
    pub fn attach(
        &mut self,
        picker: &mut impl FilePicker,
        now: E::Instant,
    ) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(bytes) = picker.pick() else {
            trace!("file picker yielded nothing");
            return Vec::new();
        };
        let media = MediaLocator::from_blob(&self.env, &bytes).into_image();
        self.submit("", Some(media), None, now)
    }

    fn submit(
        &mut self,
        content: &str,
        media: Option<Media>,
        ttl: Option<Duration>,
        now: E::Instant,
    ) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }
        if content.trim().is_empty() && media.is_none() {
            trace!("ignoring empty send");
            return Vec::new();
        }

        let id = self.fresh_local_id();
        let mut message = Message::text(
            id.clone(),
            Sender::Me,
            content,
            self.env.wall_clock_millis(),
            DeliveryStatus::Sent,
        );
        message.media = media;
        if let Some(ttl) = ttl {
            message = message.with_ttl(ttl);
            self.schedule_after(now, ttl, TaskKind::ExpireEphemeral(id.clone()));
        }
        self.messages.push(message);

        self.schedule_after(now, self.config.delivered_after, TaskKind::MarkDelivered(id.clone()));
        self.schedule_after(now, self.config.read_after, TaskKind::MarkRead(id.clone()));

        if self.env.chance(self.config.reply_probability) {
            let typing_at = now.checked_after(self.config.reply_typing_after);
            let reply_at = now.checked_after(self.config.reply_after);
            if let (Some(typing_at), Some(reply_at)) = (typing_at, reply_at) {
                let reply = self.next_reply;
                self.next_reply += 1;
                self.tasks.schedule(typing_at, TaskKind::ReplyTypingStart(reply));
                self.tasks.schedule(reply_at, TaskKind::DeliverReply(reply));
                debug!(message_id = %id, reply, "reply scheduled");
            }
        }

        debug!(message_id = %id, "message sent");
        vec![ConversationAction::Render]
    }

    /// Reveal one-time-view media.
    ///
    /// Marks the media viewed immediately and schedules its expiry after the
    /// grace period. No-op if the message has no unrevealed one-time media.
    pub fn reveal_once(&mut self, id: &MessageId, now: E::Instant) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(media) = self.find_mut(id).and_then(|m| m.media.as_mut()) else {
            return Vec::new();
        };
        if !media.is_revealable() {
            return Vec::new();
        }

        media.viewed = true;
        let grace = self.config.one_time_view_grace;
        self.schedule_after(now, grace, TaskKind::ExpireMedia(id.clone()));
        debug!(message_id = %id, "one-time media revealed");
        vec![ConversationAction::Render]
    }

    /// Toggle the local user's `emoji` reaction on a message.
    ///
    /// No-op if the message does not exist.
    pub fn toggle_reaction(&mut self, id: &MessageId, emoji: &str) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(message) = self.find_mut(id) else {
            return Vec::new();
        };
        let added = message.toggle_reaction(emoji, Sender::Me);
        debug!(message_id = %id, emoji, added, "reaction toggled");
        vec![ConversationAction::Render]
    }

    /// Remove an ephemeral message and cancel everything scheduled for it.
    ///
    /// No-op if the message does not exist or is not ephemeral.
    pub fn expire_ephemeral(&mut self, id: &MessageId) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(index) = self.messages.iter().position(|m| &m.id == id && m.is_ephemeral())
        else {
            return Vec::new();
        };

        self.messages.remove(index);
        let cancelled = self.tasks.cancel_for_message(id);
        debug!(message_id = %id, cancelled, "ephemeral message expired");
        vec![ConversationAction::Render]
    }

    /// Apply every scheduled transition due at or before `now`.
    ///
    /// Transitions run in deadline order. A transition scheduled by another
    /// one (the next ambient tick, the end of a typing burst) is applied in
    /// the same call if it also falls due by `now`.
    pub fn handle_tick(&mut self, now: E::Instant) -> Vec<ConversationAction> {
        if !self.is_active() {
            return Vec::new();
        }

        let mut notifications = Vec::new();
        let mut changed = false;
        while let Some((deadline, task)) = self.tasks.pop_due(now) {
            changed |= self.apply(task, deadline, &mut notifications);
        }

        let mut actions: Vec<ConversationAction> =
            notifications.into_iter().map(ConversationAction::Notify).collect();
        if changed {
            actions.push(ConversationAction::Render);
        }
        actions
    }

    /// Apply one due task. Returns `true` if visible state changed.
    fn apply(
        &mut self,
        task: TaskKind,
        fired_at: E::Instant,
        notifications: &mut Vec<Notification>,
    ) -> bool {
        match task {
            TaskKind::MarkDelivered(id) => self.advance_status(&id, DeliveryStatus::Delivered),
            TaskKind::MarkRead(id) => self.advance_status(&id, DeliveryStatus::Read),
            TaskKind::ReplyTypingStart(reply) => self.typing.insert(TypingSource::Reply(reply)),
            TaskKind::DeliverReply(reply) => {
                self.typing.remove(&TypingSource::Reply(reply));
                let Some(content) = self
                    .env
                    .choose_index(self.config.reply_pool.len())
                    .and_then(|i| self.config.reply_pool.get(i).cloned())
                else {
                    return true;
                };
                let id = self.fresh_reply_id();
                debug!(message_id = %id, "reply delivered");
                self.messages.push(Message::text(
                    id,
                    Sender::Peer,
                    content,
                    self.env.wall_clock_millis(),
                    DeliveryStatus::Delivered,
                ));
                true
            },
            TaskKind::ExpireMedia(id) => {
                let marker = self.config.expired_media_marker.clone();
                let Some(message) = self.find_mut(&id) else {
                    trace!(message_id = %id, "stale media expiry skipped");
                    return false;
                };
                message.media = None;
                message.content = marker;
                debug!(message_id = %id, "one-time media expired");
                notifications
                    .push(Notification::info(MEDIA_EXPIRED_TITLE, MEDIA_EXPIRED_DESCRIPTION));
                true
            },
            TaskKind::ExpireEphemeral(id) => !self.expire_ephemeral(&id).is_empty(),
            TaskKind::AmbientTyping => {
                let interval = self.config.ambient_interval();
                self.schedule_after(fired_at, interval, TaskKind::AmbientTyping);
                if !self.env.chance(self.config.ambient_typing_probability) {
                    return false;
                }
                let duration = self.config.ambient_typing_duration;
                if !self.schedule_after(fired_at, duration, TaskKind::AmbientTypingStop) {
                    return false;
                }
                trace!("ambient typing started");
                self.typing.insert(TypingSource::Ambient)
            },
            TaskKind::AmbientTypingStop => self.typing.remove(&TypingSource::Ambient),
        }
    }

    /// Schedule `kind` at `from + after`.
    ///
    /// A deadline the instant type cannot represent is never reached, so the
    /// task is dropped. Returns `false` in that case.
    fn schedule_after(&mut self, from: E::Instant, after: Duration, kind: TaskKind) -> bool {
        match from.checked_after(after) {
            Some(deadline) => {
                self.tasks.schedule(deadline, kind);
                true
            },
            None => {
                debug!(?kind, ?after, "deadline out of range, task dropped");
                false
            },
        }
    }

    fn advance_status(&mut self, id: &MessageId, target: DeliveryStatus) -> bool {
        let Some(message) = self.find_mut(id) else {
            trace!(message_id = %id, status = target.label(), "stale status transition skipped");
            return false;
        };
        let advanced = message.status.advance_to(target);
        if advanced {
            debug!(message_id = %id, status = target.label(), "status advanced");
        } else {
            trace!(message_id = %id, status = target.label(), "status already past target");
        }
        advanced
    }

    /// Next `new-{n}` id not already in use.
    fn fresh_local_id(&mut self) -> MessageId {
        loop {
            let id = MessageId::local(self.next_local);
            self.next_local += 1;
            if self.find(&id).is_none() {
                return id;
            }
        }
    }

    /// Next `new-reply-{n}` id not already in use.
    fn fresh_reply_id(&mut self) -> MessageId {
        loop {
            let id = MessageId::reply(self.next_reply_message);
            self.next_reply_message += 1;
            if self.find(&id).is_none() {
                return id;
            }
        }
    }

    /// Cancel every pending task and stop accepting operations.
    ///
    /// Returns the number of tasks cancelled. Idempotent.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.typing.clear();
        let cancelled = self.tasks.cancel_all();
        info!(contact = %self.contact_id, cancelled, "conversation torn down");
        cancelled
    }

    fn is_active(&self) -> bool {
        !self.torn_down && matches!(self.view, ConversationView::Open { .. })
    }

    fn find(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    fn find_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }

    /// Contact this conversation is with.
    pub fn contact_id(&self) -> &ContactId {
        &self.contact_id
    }

    /// Open or not-found.
    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    /// Contact profile. `None` when not found.
    pub fn profile(&self) -> Option<&ContactProfile> {
        match &self.view {
            ConversationView::Open { profile } => Some(profile),
            ConversationView::NotFound => None,
        }
    }

    /// Conversation could not be loaded.
    pub fn is_not_found(&self) -> bool {
        self.view == ConversationView::NotFound
    }

    /// Messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message.
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.find(id)
    }

    /// Typing indicator visible.
    pub fn is_typing(&self) -> bool {
        !self.typing.is_empty()
    }

    /// Active typing sources.
    pub fn typing_sources(&self) -> impl Iterator<Item = TypingSource> + '_ {
        self.typing.iter().copied()
    }

    /// Teardown has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Pending scheduled transitions.
    pub fn tasks(&self) -> &TaskRegistry<E::Instant> {
        &self.tasks
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<E::Instant> {
        self.tasks.next_deadline()
    }

    /// Simulation policy in effect.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
