//! Service layer for business logic
//!
//! Store-facing engines (slug resolution, vote reading, publish/upsert,
//! ballot submission, community tally) plus the external collaborators
//! (screenshot chain, favicon proxy, demo example, chat notifier).

pub mod aggregate;
pub mod ballot;
pub mod community;
pub mod example;
pub mod favicon;
pub mod notify;
pub mod publish;
pub mod screenshot;
pub mod slug;
pub mod vote_reader;

pub use aggregate::AggregateTable;
pub use ballot::{BallotEngine, BallotRequest, BallotResult, VoteEntry};
pub use community::{CommunityBallot, CommunityEngine};
pub use example::{ExampleService, ExampleView};
pub use favicon::{FaviconImage, FaviconService};
pub use notify::ChatNotifier;
pub use publish::{PublishEngine, PublishRequest, PublishResult};
pub use screenshot::{ScreenshotOutcome, ScreenshotService};
pub use slug::{is_record_id, slugify, SlugResolver};
pub use vote_reader::{VoteDesign, VoteReader, VoteView};
