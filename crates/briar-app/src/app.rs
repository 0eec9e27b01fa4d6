//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the session,
//! preferences, chat list and the open conversation completely decoupled from
//! I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs with
//! the current instant and produces [`crate::AppAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Holds the explicit [`Session`]; conversation screens require one.
//! - Owns at most one [`Conversation`] and tears it down when it is replaced,
//!   closed, or the user signs out.
//! - Filters informational notifications when the user turned them off.

use std::{sync::Arc, time::Duration};

use briar_core::{
    ChatList, ChatPreview, ContactDirectory, ContactId, Conversation, ConversationAction,
    FilePicker, MessageId, MessageSeed, Notification, Preferences, Session, Severity,
    SimulationConfig, StaticDirectory, StaticSeed, UserDirectory, UserEntry, env::Environment,
};
use tracing::{debug, info, warn};

use crate::{AppAction, AppEvent, Command, command::HELP};

/// Contact every new chat opens.
const NEW_CHAT_CONTACT: &str = "1";

/// Result of the latest list command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Filtered chat list.
    Chats(Vec<ChatPreview>),
    /// User search results.
    Users(Vec<UserEntry>),
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
pub struct App<E: Environment> {
    /// Randomness and wall clock, shared with conversations.
    env: E,
    /// Policy handed to each opened conversation.
    config: SimulationConfig,
    /// Profiles for opened conversations.
    directory: Arc<dyn ContactDirectory + Send + Sync>,
    /// Initial messages for opened conversations.
    seed: Arc<dyn MessageSeed + Send + Sync>,
    /// Signed-in user. `None` until login.
    session: Option<Session>,
    /// User settings.
    preferences: Preferences,
    /// Chat list.
    chats: ChatList,
    /// Known users for new chats.
    users: UserDirectory,
    /// Currently open conversation. `None` on the list screens.
    conversation: Option<Conversation<E>>,
    /// Latest list output.
    listing: Option<Listing>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl<E: Environment> App<E> {
    /// Create an App over the prototype's static data.
    pub fn new(env: E, config: SimulationConfig) -> Self {
        Self::with_sources(env, config, Arc::new(StaticDirectory), Arc::new(StaticSeed))
    }

    /// Create an App with custom contact and message sources.
    pub fn with_sources(
        env: E,
        config: SimulationConfig,
        directory: Arc<dyn ContactDirectory + Send + Sync>,
        seed: Arc<dyn MessageSeed + Send + Sync>,
    ) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "simulation config is out of range, clamping where needed");
        }
        let chats = ChatList::prototype(env.wall_clock_millis());
        Self {
            env,
            config,
            directory,
            seed,
            session: None,
            preferences: Preferences::default(),
            chats,
            users: UserDirectory::prototype(),
            conversation: None,
            listing: None,
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent, now: E::Instant) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => match self.conversation.as_mut() {
                Some(conversation) => {
                    let actions = conversation.handle_tick(now);
                    self.translate(actions)
                },
                None => vec![],
            },
            AppEvent::Redraw => vec![AppAction::Render],
            AppEvent::Command(command) => self.handle_command(command, now),
            AppEvent::Invalid(err) => {
                debug!(%err, "rejected input");
                self.status_message = Some(err.to_string());
                vec![AppAction::Render]
            },
        }
    }

    fn handle_command(&mut self, command: Command, now: E::Instant) -> Vec<AppAction> {
        self.status_message = None;
        match command {
            Command::Login { username, password } => self.login(&username, &password),
            Command::Logout => self.logout(),
            Command::Help => {
                self.status_message = Some(HELP.to_string());
                vec![AppAction::Render]
            },
            Command::Quit => self.quit(),
            Command::Notifications => {
                let notification = self.preferences.toggle_notifications();
                vec![AppAction::Notify(notification), AppAction::Render]
            },
            Command::Timer { secs } => {
                let notification = self.preferences.set_disappearing_time(secs);
                vec![AppAction::Notify(notification), AppAction::Render]
            },
            protected => {
                if self.session.is_none() {
                    return self.require_login();
                }
                self.handle_protected(protected, now)
            },
        }
    }

    fn handle_protected(&mut self, command: Command, now: E::Instant) -> Vec<AppAction> {
        match command {
            Command::Chats { query } => {
                let chats = self.chats.filter(&query).into_iter().cloned().collect();
                self.listing = Some(Listing::Chats(chats));
                vec![AppAction::Navigate("/chats".into()), AppAction::Render]
            },
            Command::Users { query } => {
                let users = self.users.search(&query).into_iter().cloned().collect();
                self.listing = Some(Listing::Users(users));
                vec![AppAction::Navigate("/new-chat".into()), AppAction::Render]
            },
            Command::Start { user_id } => {
                debug!(user_id = %user_id, "starting chat");
                let mut actions = vec![AppAction::Notify(Notification::info(
                    "Chat started",
                    "You can now start messaging securely",
                ))];
                actions.extend(self.open(ContactId::from(NEW_CHAT_CONTACT), now));
                actions
            },
            Command::Open { contact } => self.open(ContactId::new(contact), now),
            Command::Close => self.close(),
            Command::Rename { name } => match self.session.as_mut().map(|s| s.rename(&name)) {
                Some(Ok(())) => vec![
                    AppAction::Notify(Notification::info(
                        "Profile updated",
                        "Your profile has been updated successfully",
                    )),
                    AppAction::Render,
                ],
                Some(Err(err)) => {
                    self.status_message = Some(err.to_string());
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            Command::Say(text) => self.with_conversation(|c| c.send(&text, None, now)),
            Command::Vanish { secs, text } => {
                let ttl = Duration::from_secs(secs.unwrap_or(self.preferences.disappearing_secs));
                self.with_conversation(|c| c.send_ephemeral(&text, None, ttl, now))
            },
            Command::View { message } => {
                self.with_conversation(|c| c.reveal_once(&MessageId::new(message), now))
            },
            Command::React { message, emoji } => {
                self.with_conversation(|c| c.toggle_reaction(&MessageId::new(message), &emoji))
            },
            Command::Attach { path } => {
                if self.conversation.is_some() {
                    vec![AppAction::PickFile { hint: path }]
                } else {
                    self.no_conversation()
                }
            },
            Command::Login { .. }
            | Command::Logout
            | Command::Help
            | Command::Quit
            | Command::Notifications
            | Command::Timer { .. } => vec![],
        }
    }

    fn with_conversation(
        &mut self,
        op: impl FnOnce(&mut Conversation<E>) -> Vec<ConversationAction>,
    ) -> Vec<AppAction> {
        match self.conversation.as_mut() {
            Some(conversation) => {
                let actions = op(conversation);
                self.translate(actions)
            },
            None => self.no_conversation(),
        }
    }

    fn no_conversation(&mut self) -> Vec<AppAction> {
        self.status_message = Some("No conversation open".into());
        vec![AppAction::Render]
    }

    /// Attach whatever `picker` yields to the open conversation.
    pub fn attach(&mut self, picker: &mut impl FilePicker, now: E::Instant) -> Vec<AppAction> {
        self.with_conversation(|c| c.attach(picker, now))
    }

    fn login(&mut self, username: &str, password: &str) -> Vec<AppAction> {
        match Session::sign_in(username, password) {
            Ok(session) => {
                info!(username = session.username(), "signed in");
                self.session = Some(session);
                vec![
                    AppAction::Notify(Notification::info(
                        "Success",
                        "You have successfully logged in",
                    )),
                    AppAction::Navigate("/chats".into()),
                    AppAction::Render,
                ]
            },
            Err(err) => {
                let (title, description) = err.notice();
                vec![AppAction::Notify(Notification::destructive(title, description))]
            },
        }
    }

    fn logout(&mut self) -> Vec<AppAction> {
        self.teardown_conversation();
        self.session = None;
        self.listing = None;
        vec![AppAction::Navigate("/login".into()), AppAction::Render]
    }

    fn require_login(&self) -> Vec<AppAction> {
        vec![
            AppAction::Notify(Notification::destructive(
                "Authentication required",
                "Please log in to access this page",
            )),
            AppAction::Navigate("/login".into()),
            AppAction::Render,
        ]
    }

    fn open(&mut self, contact: ContactId, now: E::Instant) -> Vec<AppAction> {
        self.teardown_conversation();
        let path = format!("/chats/{contact}");
        self.chats.mark_read(&contact);
        self.conversation = Some(Conversation::open(
            contact,
            self.directory.as_ref(),
            self.seed.as_ref(),
            self.env.clone(),
            self.config.clone(),
            now,
        ));
        vec![AppAction::Navigate(path), AppAction::Render]
    }

    fn close(&mut self) -> Vec<AppAction> {
        self.teardown_conversation();
        vec![AppAction::Navigate("/chats".into()), AppAction::Render]
    }

    /// Tear down the open conversation and quit.
    pub fn quit(&mut self) -> Vec<AppAction> {
        self.teardown_conversation();
        vec![AppAction::Quit]
    }

    fn teardown_conversation(&mut self) {
        if let Some(mut conversation) = self.conversation.take() {
            conversation.teardown();
        }
    }

    /// Convert conversation actions, dropping informational notifications
    /// when the user disabled them.
    fn translate(&self, actions: Vec<ConversationAction>) -> Vec<AppAction> {
        actions
            .into_iter()
            .filter_map(|action| match action {
                ConversationAction::Render => Some(AppAction::Render),
                ConversationAction::Notify(n) => {
                    if self.preferences.notifications_enabled || n.severity == Severity::Destructive
                    {
                        Some(AppAction::Notify(n))
                    } else {
                        debug!(title = %n.title, "notification suppressed");
                        None
                    }
                },
            })
            .collect()
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Signed-in session. `None` before login.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// User preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Open conversation. `None` on list screens.
    pub fn conversation(&self) -> Option<&Conversation<E>> {
        self.conversation.as_ref()
    }

    /// Latest list output.
    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }

    /// Chat list.
    pub fn chats(&self) -> &ChatList {
        &self.chats
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
