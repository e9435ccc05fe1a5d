pub mod archive;
pub mod live;
pub mod replay;
pub mod report;
pub mod review;
