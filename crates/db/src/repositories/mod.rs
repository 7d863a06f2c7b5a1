//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Deletes on image-carrying
//! tables return the removed row (and any cascaded child image paths) so the
//! caller can clean up the stored blobs.

pub mod board_member_repo;
pub mod branch_repo;
pub mod contractor_repo;
pub mod gallery_image_repo;
pub mod management_repo;
pub mod news_article_repo;
pub mod news_category_repo;
pub mod news_image_repo;
pub mod person_repo;
pub mod project_award_repo;
pub mod project_category_repo;
pub mod project_image_repo;
pub mod project_repo;
pub mod project_team_repo;
pub mod publication_repo;

pub use board_member_repo::BoardMemberRepo;
pub use branch_repo::BranchRepo;
pub use contractor_repo::{ContractorRoleRepo, ProjectContractorRepo};
pub use gallery_image_repo::GalleryImageRepo;
pub use management_repo::{MainCategoryRepo, StaffRepo, SubCategoryRepo};
pub use news_article_repo::NewsArticleRepo;
pub use news_category_repo::NewsCategoryRepo;
pub use news_image_repo::NewsImageRepo;
pub use person_repo::PersonRepo;
pub use project_award_repo::ProjectAwardRepo;
pub use project_category_repo::ProjectCategoryRepo;
pub use project_image_repo::ProjectImageRepo;
pub use project_repo::ProjectRepo;
pub use project_team_repo::ProjectTeamRepo;
pub use publication_repo::PublicationRepo;
