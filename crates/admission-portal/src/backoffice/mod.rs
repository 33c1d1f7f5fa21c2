//! Helpers behind the admin back office: application review, list paging
//! and the landing-page overview.

pub mod applications;
pub mod dashboard;
pub mod pagination;

pub use applications::{
    referees, ApplicationReviewer, RefereeView, ReviewAction, ReviewApi, ReviewError,
    StatusFilter, REFEREE_PLACEHOLDER,
};
pub use dashboard::{ActivityItem, ActivityKind, DashboardOverview, RECENT_ACTIVITY_LIMIT};
pub use pagination::{Pagination, DEFAULT_PAGE_SIZE};
