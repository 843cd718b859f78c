pub mod ids;
pub mod inquiry;
pub mod message;
pub mod preview;
pub mod sync;
pub mod thread;
pub mod time;
pub mod user;

pub use self::ids::{Identifier, InquiryId, ListingId, MessageId, ThreadId, UserId};
pub use self::inquiry::Inquiry;
pub use self::message::Message;
pub use self::preview::ChatPreview;
pub use self::sync::MessageSync;
pub use self::thread::Thread;
pub use self::time::Time;
pub use self::user::{UserCreate, UserProfile};
