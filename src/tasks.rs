// In-process FIFO task queue for invite mails and score updates.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::db::Database;
use crate::error::AppError;
use crate::metrics;

/// Body of every invite mail; `{url}` is the sign-in link.
const INVITE_MESSAGE: &str = "
Hi,
Join us on Gonawin.

You will be able to bet on tournament and win some rewards!

Sign in here: {url}

Have fun,
Your friends @ Gonawin
";

pub fn invite_body(url: &str) -> String {
    INVITE_MESSAGE.replace("{url}", url)
}

pub fn invite_subject(name: &str) -> String {
    format!("{name} wants you to join Gonawin!")
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Loose address check: something, `@`, something, `.`, something, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Split a comma list of addresses, returning the trimmed addresses and
/// the ones that do not look like an email.
pub fn parse_emails(list: &str) -> (Vec<String>, Vec<String>) {
    let emails: Vec<String> = list
        .split(',')
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    let invalid = emails
        .iter()
        .filter(|e| !is_valid_email(e))
        .cloned()
        .collect();
    (emails, invalid)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    SendInvite {
        email: String,
        name: String,
        body: String,
    },
    UpdateScores {
        tournament_id: i64,
        match_id: i64,
    },
}

impl Task {
    fn kind(&self) -> &'static str {
        match self {
            Task::SendInvite { .. } => "send_invite",
            Task::UpdateScores { .. } => "update_scores",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskQueueStatus {
    pub depth: usize,
}

/// Times a task may fail on a transient error before it is dropped.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug)]
struct Queued {
    task: Task,
    failures: u32,
}

/// Thread-safe FIFO task queue.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    inner: Arc<Mutex<VecDeque<Queued>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Queued>> {
        // a panicking holder cannot leave the deque half-updated
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn enqueue(&self, task: Task) {
        self.push(Queued { task, failures: 0 });
    }

    pub fn dequeue(&self) -> Option<Task> {
        self.pop().map(|q| q.task)
    }

    fn push(&self, queued: Queued) {
        let mut queue = self.lock();
        queue.push_back(queued);
        metrics::TASK_QUEUE_DEPTH.set(queue.len() as i64);
    }

    fn pop(&self) -> Option<Queued> {
        let mut queue = self.lock();
        let queued = queue.pop_front();
        metrics::TASK_QUEUE_DEPTH.set(queue.len() as i64);
        queued
    }

    pub fn depth(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn status(&self) -> TaskQueueStatus {
        TaskQueueStatus {
            depth: self.depth(),
        }
    }
}

// ── Mail ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub sender: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers outgoing mail.
pub trait Mailer: Send + Sync + 'static {
    fn send(&self, email: &Email) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Keeps every message in the `outbox` table.
#[derive(Clone)]
pub struct OutboxMailer {
    db: Arc<Database>,
}

impl OutboxMailer {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Mailer for OutboxMailer {
    async fn send(&self, email: &Email) -> Result<(), AppError> {
        let stored = self
            .db
            .insert_outbox(&email.sender, &email.to, &email.subject, &email.body)
            .await?;
        tracing::info!(id = stored.id, to = %email.to, subject = %email.subject, "Mail stored in outbox");
        Ok(())
    }
}

// ── Worker ───────────────────────────────────────────────────────────

/// Run one task to completion.
pub async fn process_task<M: Mailer>(
    db: &Database,
    mailer: &M,
    sender: &str,
    task: Task,
) -> Result<(), AppError> {
    match task {
        Task::SendInvite { email, name, body } => {
            mailer
                .send(&Email {
                    sender: sender.to_string(),
                    to: email.clone(),
                    subject: invite_subject(&name),
                    body,
                })
                .await?;
            metrics::INVITES_SENT_TOTAL.inc();
            tracing::info!(%email, "Invite sent");
        }
        Task::UpdateScores {
            tournament_id,
            match_id,
        } => {
            crate::league::update_scores(db, tournament_id, match_id).await?;
        }
    }
    Ok(())
}

/// Only database errors are worth another attempt; a missing match or a
/// bad address fails the same way every time.
fn is_transient(e: &AppError) -> bool {
    matches!(e, AppError::Database(_))
}

/// Run every task queued at the time of the call once. A task failing on a
/// transient error goes back to the end of the queue until it has failed
/// `MAX_ATTEMPTS` times. Returns how many tasks were dropped.
pub async fn drain_queue<M: Mailer>(db: &Database, queue: &TaskQueue, mailer: &M, sender: &str) -> usize {
    let mut dropped = 0;
    for _ in 0..queue.depth() {
        let Some(Queued { task, failures }) = queue.pop() else {
            break;
        };
        let kind = task.kind();
        match process_task(db, mailer, sender, task.clone()).await {
            Ok(()) => {
                metrics::TASKS_PROCESSED_TOTAL
                    .with_label_values(&[kind, "ok"])
                    .inc();
                tracing::debug!(kind, "Task processed");
            }
            Err(e) if is_transient(&e) && failures + 1 < MAX_ATTEMPTS => {
                metrics::TASKS_PROCESSED_TOTAL
                    .with_label_values(&[kind, "retry"])
                    .inc();
                tracing::warn!(kind, attempt = failures + 1, "Task failed, retrying: {e}");
                queue.push(Queued {
                    task,
                    failures: failures + 1,
                });
            }
            Err(e) => {
                metrics::TASKS_PROCESSED_TOTAL
                    .with_label_values(&[kind, "error"])
                    .inc();
                tracing::error!(kind, attempts = failures + 1, ?task, "Task dropped: {e}");
                dropped += 1;
            }
        }
    }
    dropped
}

/// Spawn a background task that drains the queue every `poll` interval.
pub fn spawn_task_worker<M: Mailer>(
    db: Arc<Database>,
    queue: TaskQueue,
    mailer: M,
    sender: String,
    poll: Duration,
) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(poll).await;
            drain_queue(&db, &queue, &mailer, &sender).await;
        }
    });
}
