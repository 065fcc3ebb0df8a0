/// 业务错误码，随 `ApiResponse.code` 返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1500,

    // 认证 / 用户
    AuthFailed = 2000,
    PasswordPolicyViolation = 2001,
    UserNotFound = 2100,
    UserAlreadyExists = 2101,
    UserCreationFailed = 2102,

    // 课程 / 选课
    CourseNotFound = 3000,
    CourseAlreadyExists = 3001,
    CoursePermissionDenied = 3002,
    EnrollmentNotFound = 3003,
    ProfessorAlreadyAssigned = 3004,
    EnrollmentAlreadyExists = 3005,
    InvalidEnrollmentRole = 3006,
    AssessmentNotFound = 3100,

    // 成绩 / 改分
    GradeNotFound = 4000,
    GradeExceedsMaxPoints = 4001,
    GradeChangeNotFound = 4100,
    GradeChangeAlreadyPending = 4101,
    GradeChangeAlreadyReviewed = 4102,
    GradeChangeOutdated = 4103,

    // 考勤
    AttendanceTokenInvalid = 5000,
    AttendanceTokenExpired = 5001,
    AttendanceOutOfRange = 5002,
    AttendanceInvalidLocation = 5003,
    AttendanceSessionNotFound = 5004,
    AttendanceSessionNotOpen = 5005,

    // 课表
    ScheduleConflict = 6000,
    ScheduleNotFound = 6001,

    // 公告 / 广告
    AnnouncementNotFound = 7000,
    AdNotFound = 7100,

    // 文件
    FileNotFound = 8000,
    FileUploadFailed = 8001,
    FileTypeNotAllowed = 8002,
    FileSizeExceeded = 8003,
    MultifileUploadNotAllowed = 8004,
}
