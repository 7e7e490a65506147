//! In-memory implementations of the repository traits
//!
//! One `MemoryStore` backs every repository so multi-table operations see
//! a consistent state, the way a single database would.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bookclub_common::{JwtService, MessagingConfig};
use bookclub_core::entities::{
    Club, ClubFilter, ClubMember, ClubMessage, ClubRole, ClubSummary, Conversation,
    ConversationStart, DenyOutcome, DirectMessage, DirectPair, DirectRequest, InboxEntry,
    InboxPreview, Invitation, MessageAuthor, NewClub, NewClubMessage, NewDirectMessage,
    NewInvitation, NewNotification, Notification, Participant, ParticipantState, User,
};
use bookclub_core::traits::{
    ClubMemberRepository, ClubMessageRepository, ClubRepository, ConversationRepository,
    DirectMessageRepository, InvitationRepository, MessageQuery, NotificationRepository,
    RepoResult, UserRepository,
};
use bookclub_core::{
    Actor, AuthenticatedActor, ClubId, ConversationId, DirectMessageId, DomainError,
    InvitationId, MessageId, NotificationId, UserId,
};
use bookclub_service::{ServiceContext, ServiceContextBuilder};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-service-tests";

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    clubs: BTreeMap<ClubId, Club>,
    members: BTreeMap<(ClubId, UserId), ClubMember>,
    messages: Vec<ClubMessage>,
    conversations: BTreeMap<ConversationId, Conversation>,
    pairs: HashMap<DirectPair, ConversationId>,
    participants: Vec<Participant>,
    direct_messages: Vec<DirectMessage>,
    notifications: Vec<Notification>,
    invitations: Vec<Invitation>,
}

impl State {
    fn author(&self, user_id: UserId) -> Option<MessageAuthor> {
        self.users
            .get(&user_id)
            .map(|u| MessageAuthor::new(u.id, u.name.clone()))
    }

    fn mark_notification_read(&mut self, user_id: UserId, id: NotificationId, now: DateTime<Utc>) -> bool {
        match self
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.read_at.get_or_insert(now);
                true
            }
            None => false,
        }
    }
}

/// Shared in-memory store
pub struct MemoryStore {
    state: RwLock<State>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(State::default()),
            next_id: AtomicI64::new(1),
        })
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // === Seeding ===

    pub async fn seed_user(&self, name: &str) -> User {
        let user = User::new(UserId::new(self.next_id()), name);
        self.state.write().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn mute_until(&self, user_id: UserId, until: DateTime<Utc>) {
        if let Some(user) = self.state.write().await.users.get_mut(&user_id) {
            user.muted_until = Some(until);
        }
    }

    pub async fn ban(&self, user_id: UserId) {
        if let Some(user) = self.state.write().await.users.get_mut(&user_id) {
            user.is_banned = true;
        }
    }

    /// Public club, as created by the admin flow
    pub async fn seed_public_club(&self, name: &str) -> Club {
        let now = Utc::now();
        let club = Club {
            id: ClubId::new(self.next_id()),
            owner_id: None,
            book_id: None,
            name: name.to_string(),
            is_public: true,
            cover_image: None,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.clubs.insert(club.id, club.clone());
        club
    }

    pub async fn seed_private_club(&self, owner: UserId, name: &str) -> Club {
        let draft = NewClub::private(owner, name, None).expect("valid club name");
        ClubRepository::create_private(self, &draft)
            .await
            .expect("create private club")
    }

    pub async fn seed_member(&self, club_id: ClubId, user_id: UserId, role: ClubRole) {
        ClubMemberRepository::add(self, club_id, user_id, role)
            .await
            .expect("add member");
    }

    pub async fn expire_invitation(&self, token: &str) {
        let mut state = self.state.write().await;
        if let Some(invitation) = state.invitations.iter_mut().find(|i| i.token == token) {
            invitation.expires_at = Utc::now() - Duration::minutes(1);
        }
    }

    // === Inspection ===

    pub async fn user(&self, user_id: UserId) -> User {
        self.state.read().await.users[&user_id].clone()
    }

    pub async fn club_message_count(&self, club_id: ClubId) -> usize {
        self.state
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.club_id == club_id)
            .count()
    }

    pub async fn direct_message_count(&self) -> usize {
        self.state.read().await.direct_messages.len()
    }

    pub async fn conversation_count(&self) -> usize {
        self.state.read().await.conversations.len()
    }

    pub async fn participant_count(&self) -> usize {
        self.state.read().await.participants.len()
    }

    pub async fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn is_member(&self, club_id: ClubId, user_id: UserId) -> bool {
        self.state
            .read()
            .await
            .members
            .contains_key(&(club_id, user_id))
    }
}

/// Newest-first keyset page over id-ordered rows
fn keyset<T: Clone, I: Copy + Into<i64>>(
    rows: impl Iterator<Item = T>,
    id_of: impl Fn(&T) -> i64,
    query: MessageQuery<I>,
) -> Vec<T> {
    let limit = usize::try_from(query.clamped_limit()).unwrap_or(0);
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(id_of(r)));

    match (query.before, query.after) {
        (Some(before), _) => {
            let before: i64 = before.into();
            rows.into_iter()
                .filter(|r| id_of(r) < before)
                .take(limit)
                .collect()
        }
        (None, Some(after)) => {
            let after: i64 = after.into();
            let mut newer: Vec<T> = rows
                .into_iter()
                .rev()
                .filter(|r| id_of(r) > after)
                .take(limit)
                .collect();
            newer.reverse();
            newer
        }
        (None, None) => rows.into_iter().take(limit).collect(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.name == name)
            .cloned())
    }
}

#[async_trait]
impl ClubRepository for MemoryStore {
    async fn find_by_id(&self, id: ClubId) -> RepoResult<Option<Club>> {
        Ok(self.state.read().await.clubs.get(&id).cloned())
    }

    async fn list_public(&self, filter: &ClubFilter) -> RepoResult<Vec<ClubSummary>> {
        let state = self.state.read().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut clubs: Vec<ClubSummary> = state
            .clubs
            .values()
            .filter(|c| c.is_public)
            .filter(|c| filter.book_id.is_none() || c.book_id == filter.book_id)
            .filter(|c| {
                search
                    .as_ref()
                    .map_or(true, |s| c.name.to_lowercase().contains(s))
            })
            .map(|c| ClubSummary {
                club: c.clone(),
                member_count: state.members.keys().filter(|(id, _)| *id == c.id).count() as i64,
            })
            .collect();
        clubs.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then(b.club.id.cmp(&a.club.id))
        });

        let offset = usize::try_from(filter.offset()).unwrap_or(0);
        let limit = usize::try_from(filter.limit()).unwrap_or(0);
        Ok(clubs.into_iter().skip(offset).take(limit).collect())
    }

    async fn member_count(&self, club_id: ClubId) -> RepoResult<i64> {
        let state = self.state.read().await;
        Ok(state.members.keys().filter(|(id, _)| *id == club_id).count() as i64)
    }

    async fn create_private(&self, club: &NewClub) -> RepoResult<Club> {
        let now = Utc::now();
        let created = Club {
            id: ClubId::new(self.next_id()),
            owner_id: Some(club.owner_id),
            book_id: club.book_id,
            name: club.name.clone(),
            is_public: false,
            cover_image: None,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.write().await;
        state.clubs.insert(created.id, created.clone());
        state.members.insert(
            (created.id, club.owner_id),
            ClubMember::new(created.id, club.owner_id, ClubRole::Owner),
        );
        Ok(created)
    }

    async fn rename(&self, club_id: ClubId, name: &str) -> RepoResult<Club> {
        let mut state = self.state.write().await;
        let club = state
            .clubs
            .get_mut(&club_id)
            .ok_or(DomainError::ClubNotFound(club_id))?;
        club.name = name.to_string();
        club.updated_at = Utc::now();
        Ok(club.clone())
    }

    async fn delete(&self, club_id: ClubId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        state
            .clubs
            .remove(&club_id)
            .ok_or(DomainError::ClubNotFound(club_id))?;
        state.members.retain(|(id, _), _| *id != club_id);
        state.messages.retain(|m| m.club_id != club_id);
        state.invitations.retain(|i| i.club_id != club_id);
        Ok(())
    }
}

#[async_trait]
impl ClubMemberRepository for MemoryStore {
    async fn find(&self, club_id: ClubId, user_id: UserId) -> RepoResult<Option<ClubMember>> {
        Ok(self
            .state
            .read()
            .await
            .members
            .get(&(club_id, user_id))
            .cloned())
    }

    async fn add(&self, club_id: ClubId, user_id: UserId, role: ClubRole) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        if state.members.contains_key(&(club_id, user_id)) {
            return Ok(false);
        }
        state
            .members
            .insert((club_id, user_id), ClubMember::new(club_id, user_id, role));
        Ok(true)
    }

    async fn remove(&self, club_id: ClubId, user_id: UserId) -> RepoResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .members
            .remove(&(club_id, user_id))
            .is_some())
    }
}

#[async_trait]
impl ClubMessageRepository for MemoryStore {
    async fn create(&self, message: &NewClubMessage) -> RepoResult<ClubMessage> {
        let mut state = self.state.write().await;
        let created = ClubMessage {
            id: MessageId::new(self.next_id()),
            club_id: message.club_id,
            author: message.author_id.and_then(|id| state.author(id)),
            kind: message.kind,
            body: message.body.as_str().to_string(),
            created_at: Utc::now(),
        };
        state.messages.push(created.clone());
        Ok(created)
    }

    async fn find_by_club(
        &self,
        club_id: ClubId,
        query: MessageQuery<MessageId>,
    ) -> RepoResult<Vec<ClubMessage>> {
        let state = self.state.read().await;
        Ok(keyset(
            state.messages.iter().filter(|m| m.club_id == club_id).cloned(),
            |m| m.id.into_inner(),
            query,
        ))
    }
}

#[async_trait]
impl ConversationRepository for MemoryStore {
    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>> {
        Ok(self.state.read().await.conversations.get(&id).cloned())
    }

    async fn find_direct(&self, pair: DirectPair) -> RepoResult<Option<ConversationId>> {
        Ok(self.state.read().await.pairs.get(&pair).copied())
    }

    async fn start_direct(&self, request: &DirectRequest) -> RepoResult<ConversationStart> {
        let mut state = self.state.write().await;
        if let Some(id) = state.pairs.get(&request.pair) {
            return Ok(ConversationStart {
                conversation_id: *id,
                created: false,
                notification_id: None,
            });
        }

        let now = Utc::now();
        let id = ConversationId::new(self.next_id());
        state.conversations.insert(
            id,
            Conversation {
                id,
                is_group: false,
                created_at: now,
                updated_at: now,
            },
        );
        state.pairs.insert(request.pair, id);
        state.participants.push(Participant {
            conversation_id: id,
            user_id: request.initiator_id,
            state: ParticipantState::Approved { at: now },
            invited_by: Some(request.initiator_id),
            last_read_at: None,
        });
        state.participants.push(Participant {
            conversation_id: id,
            user_id: request.target_id,
            state: ParticipantState::Pending,
            invited_by: Some(request.initiator_id),
            last_read_at: None,
        });

        let draft = NewNotification::dm_request(
            request.target_id,
            id,
            request.initiator_id,
            request.initiator_name.clone(),
        );
        state.notifications.push(Notification {
            id: draft.id,
            user_id: draft.user_id,
            kind: draft.payload.kind().to_string(),
            data: draft.payload.to_data(),
            created_at: now,
            read_at: None,
        });

        Ok(ConversationStart {
            conversation_id: id,
            created: true,
            notification_id: Some(draft.id),
        })
    }

    async fn find_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>> {
        Ok(self
            .state
            .read()
            .await
            .participants
            .iter()
            .find(|p| p.conversation_id == conversation_id && p.user_id == user_id)
            .cloned())
    }

    async fn participants(&self, conversation_id: ConversationId) -> RepoResult<Vec<Participant>> {
        Ok(self
            .state
            .read()
            .await
            .participants
            .iter()
            .filter(|p| p.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn approve(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<Participant> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let participant = state
            .participants
            .iter_mut()
            .find(|p| p.conversation_id == conversation_id && p.user_id == user_id)
            .ok_or(DomainError::NotParticipant)?;
        if participant.state.is_pending() {
            participant.state = ParticipantState::Approved { at: now };
        }
        let approved = participant.clone();

        if let Some(id) = notification_id {
            state.mark_notification_read(user_id, id, now);
        }
        Ok(approved)
    }

    async fn withdraw(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<DenyOutcome> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        if !state.conversations.contains_key(&conversation_id) {
            return Err(DomainError::ConversationNotFound(conversation_id));
        }

        let before = state.participants.len();
        state
            .participants
            .retain(|p| !(p.conversation_id == conversation_id && p.user_id == user_id));
        if state.participants.len() == before {
            return Err(DomainError::NotParticipant);
        }

        if let Some(id) = notification_id {
            state.mark_notification_read(user_id, id, now);
        }

        let remaining = state
            .participants
            .iter()
            .filter(|p| p.conversation_id == conversation_id)
            .count();
        let conversation_deleted = remaining <= 1;
        if conversation_deleted {
            state.conversations.remove(&conversation_id);
            state.pairs.retain(|_, id| *id != conversation_id);
            state
                .participants
                .retain(|p| p.conversation_id != conversation_id);
            state
                .direct_messages
                .retain(|m| m.conversation_id != conversation_id);
        }

        Ok(DenyOutcome {
            conversation_deleted,
        })
    }

    async fn mark_read(&self, conversation_id: ConversationId, user_id: UserId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if let Some(p) = state
            .participants
            .iter_mut()
            .find(|p| p.conversation_id == conversation_id && p.user_id == user_id)
        {
            p.last_read_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn inbox(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<InboxEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<InboxEntry> = state
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter_map(|own| {
                let conversation = state.conversations.get(&own.conversation_id)?;
                let other = state
                    .participants
                    .iter()
                    .find(|p| p.conversation_id == own.conversation_id && p.user_id != user_id)
                    .and_then(|p| state.author(p.user_id));
                let last_message = state
                    .direct_messages
                    .iter()
                    .filter(|m| m.conversation_id == own.conversation_id)
                    .max_by_key(|m| m.id)
                    .map(|m| InboxPreview {
                        id: m.id,
                        sender_id: m.sender.id,
                        body: m.body.clone(),
                        created_at: m.created_at,
                    });
                Some(InboxEntry {
                    conversation_id: conversation.id,
                    other,
                    pending: own.state.is_pending(),
                    last_message,
                    last_read_at: own.last_read_at,
                    updated_at: conversation.updated_at,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(b.conversation_id.cmp(&a.conversation_id))
        });
        entries.truncate(usize::try_from(limit.clamp(1, 200)).unwrap_or(0));
        Ok(entries)
    }
}

#[async_trait]
impl DirectMessageRepository for MemoryStore {
    async fn create(&self, message: &NewDirectMessage) -> RepoResult<DirectMessage> {
        let mut state = self.state.write().await;
        let sender = state
            .author(message.sender_id)
            .ok_or(DomainError::UserNotFound(message.sender_id))?;
        let now = Utc::now();
        let created = DirectMessage {
            id: DirectMessageId::new(self.next_id()),
            conversation_id: message.conversation_id,
            sender,
            body: message.body.as_str().to_string(),
            created_at: now,
        };
        if let Some(conversation) = state.conversations.get_mut(&message.conversation_id) {
            conversation.updated_at = now;
        }
        state.direct_messages.push(created.clone());
        Ok(created)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
        query: MessageQuery<DirectMessageId>,
    ) -> RepoResult<Vec<DirectMessage>> {
        let state = self.state.read().await;
        Ok(keyset(
            state
                .direct_messages
                .iter()
                .filter(|m| m.conversation_id == conversation_id)
                .cloned(),
            |m| m.id.into_inner(),
            query,
        ))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: &NewNotification) -> RepoResult<Notification> {
        let created = Notification {
            id: notification.id,
            user_id: notification.user_id,
            kind: notification.payload.kind().to_string(),
            data: notification.payload.to_data(),
            created_at: Utc::now(),
            read_at: None,
        };
        self.state.write().await.notifications.push(created.clone());
        Ok(created)
    }

    async fn find_unread(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>> {
        let state = self.state.read().await;
        let mut unread: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read())
            .cloned()
            .collect();
        unread.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        unread.truncate(usize::try_from(limit.clamp(1, 100)).unwrap_or(0));
        Ok(unread)
    }

    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> RepoResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .mark_notification_read(user_id, id, Utc::now()))
    }
}

#[async_trait]
impl InvitationRepository for MemoryStore {
    async fn create(&self, invitation: &NewInvitation) -> RepoResult<Invitation> {
        let mut state = self.state.write().await;
        if state.invitations.iter().any(|i| i.token == invitation.token) {
            return Err(DomainError::InvitationTokenExists);
        }
        let created = Invitation {
            id: InvitationId::new(self.next_id()),
            club_id: invitation.club_id,
            inviter_id: invitation.inviter_id,
            invitee_id: invitation.invitee_id,
            email: invitation.email.clone(),
            token: invitation.token.clone(),
            expires_at: invitation.expires_at,
            accepted_at: None,
            created_at: Utc::now(),
        };
        state.invitations.push(created.clone());
        Ok(created)
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        Ok(self
            .state
            .read()
            .await
            .invitations
            .iter()
            .find(|i| i.token == token)
            .cloned())
    }

    async fn accept(&self, invitation: &Invitation, user_id: UserId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .invitations
            .iter_mut()
            .find(|i| i.id == invitation.id)
            .ok_or(DomainError::InvitationNotFound)?;
        if stored.accepted_at.is_some() {
            return Err(DomainError::InvitationAlreadyAccepted);
        }
        stored.accepted_at = Some(Utc::now());

        let club_id = invitation.club_id;
        state
            .members
            .entry((club_id, user_id))
            .or_insert_with(|| ClubMember::new(club_id, user_id, ClubRole::Member));
        Ok(())
    }
}

// ============================================================================
// Context helpers
// ============================================================================

/// Service context over `store` with default messaging limits
pub fn context(store: &Arc<MemoryStore>) -> ServiceContext {
    context_with(store, MessagingConfig::default())
}

pub fn context_with(store: &Arc<MemoryStore>, messaging: MessagingConfig) -> ServiceContext {
    ServiceContextBuilder::new()
        .user_repo(store.clone())
        .club_repo(store.clone())
        .member_repo(store.clone())
        .message_repo(store.clone())
        .conversation_repo(store.clone())
        .direct_message_repo(store.clone())
        .notification_repo(store.clone())
        .invitation_repo(store.clone())
        .jwt_service(Arc::new(JwtService::new(TEST_JWT_SECRET, 3600)))
        .messaging(messaging)
        .build()
        .expect("complete service context")
}

/// Signed-in actor for `user` with their current moderation status
pub fn signed_in(user: &User) -> AuthenticatedActor {
    AuthenticatedActor::from_user(user, Utc::now())
}

pub fn actor(user: &User) -> Actor {
    Actor::User(signed_in(user))
}
