use crate::db::StoreStats;
use crate::model::attendance::{AttendanceListResponse, AttendanceResponse, MarkAttendance};
use crate::model::employee::{CreateEmployee, Employee, EmployeeListResponse, UpdateEmployee};
use crate::stats::dashboard::{DashboardStats, RecentAttendance};
use crate::stats::reports::{
    AttendanceSummaryReport, DateRange, DepartmentEmployee, DepartmentReport, DepartmentTotals,
    EmployeeBrief, EmployeePerformanceReport, EmployeeSummary, PerformanceDay, PerformanceSummary,
    SummaryTotals,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "2.0.0",
        description = r#"
## HRMS Lite

Employee roster and daily attendance tracking with derived reporting.

### Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance Management**
  - Daily attendance marking with upsert-per-day semantics
- **Dashboard**
  - Live roster and attendance statistics
- **Reports**
  - Range summaries, per-employee performance, per-department breakdowns

### Response Format
- JSON-based RESTful responses
- Pagination (`skip`/`limit`) supported for list endpoints
- Structured error payloads with timestamps

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::root,
        crate::api::health::health,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::employee_attendance,

        crate::api::dashboard::dashboard_stats,

        crate::api::reports::attendance_summary,
        crate::api::reports::employee_performance,
        crate::api::reports::department_report
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            UpdateEmployee,
            EmployeeListResponse,
            MarkAttendance,
            AttendanceResponse,
            AttendanceListResponse,
            DashboardStats,
            RecentAttendance,
            AttendanceSummaryReport,
            SummaryTotals,
            EmployeeSummary,
            EmployeePerformanceReport,
            EmployeeBrief,
            PerformanceSummary,
            PerformanceDay,
            DepartmentReport,
            DepartmentTotals,
            DepartmentEmployee,
            DateRange,
            StoreStats
        )
    ),
    tags(
        (name = "System", description = "Health and system information"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Dashboard statistics"),
        (name = "Reports", description = "Reporting and analytics"),
    )
)]
pub struct ApiDoc;
