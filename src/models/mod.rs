pub mod course;
pub mod holes;

pub use course::{Course, CourseDetail, NewCourseRequest, Rating, RatingError, UpdateCourseRequest};
pub use holes::{CourseHoles, Hole, HolePatch, Holes};
