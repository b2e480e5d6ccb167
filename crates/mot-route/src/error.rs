use mot_core::{EntryId, PathId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("entry {0} has no game-object template")]
    MissingTemplate(EntryId),

    #[error("entry {0} is not an MO_TRANSPORT template")]
    WrongTemplateType(EntryId),

    #[error("taxi path {0} is outside the node table")]
    BadPathId(PathId),

    #[error("taxi path {0} has fewer than 2 usable nodes in a map run")]
    EmptyPath(PathId),

    #[error("taxi path {path} segment {segment} has near-zero length")]
    DegenerateSegment { path: PathId, segment: usize },
}

pub type RouteResult<T> = Result<T, RouteError>;
