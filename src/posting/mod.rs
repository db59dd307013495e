//! Posting module containing ledger resolution, document numbering,
//! voucher building, and the transactional poster

pub mod builders;
pub mod poster;
pub mod resolver;
pub mod sequence;

pub use builders::*;
pub use poster::*;
pub use resolver::*;
pub use sequence::*;
