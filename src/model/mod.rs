mod course;
mod payload;
mod record;
mod validation;

pub use course::{CourseOutline, CourseSettings};
pub use payload::{METADATA, Payload};
pub use record::{
    Category, ExamType, NOT_GRADED, PrereqOption, ShowCorrectness, Visibility, XBlockInfo,
};
pub use validation::{
    DEFAULT_TIME_LIMIT, MAX_MIN_SCORE, ValidationError, format_date_time, minutes_to_time_limit,
    parse_date_time, time_limit_to_minutes, validate_min_score, validate_time_limit,
};
