//! 预导入模块，方便使用

pub use super::advertisements::{
    ActiveModel as AdvertisementActiveModel, Entity as Advertisements,
    Model as AdvertisementModel,
};
pub use super::announcement_reads::{
    ActiveModel as AnnouncementReadActiveModel, Entity as AnnouncementReads,
    Model as AnnouncementReadModel,
};
pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assessments::{
    ActiveModel as AssessmentActiveModel, Entity as Assessments, Model as AssessmentModel,
};
pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::attendance_sessions::{
    ActiveModel as AttendanceSessionActiveModel, Entity as AttendanceSessions,
    Model as AttendanceSessionModel,
};
pub use super::course_enrollments::{
    ActiveModel as CourseEnrollmentActiveModel, Entity as CourseEnrollments,
    Model as CourseEnrollmentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::grade_change_requests::{
    ActiveModel as GradeChangeActiveModel, Entity as GradeChangeRequests,
    Model as GradeChangeModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::schedule_slots::{
    ActiveModel as ScheduleSlotActiveModel, Entity as ScheduleSlots, Model as ScheduleSlotModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
