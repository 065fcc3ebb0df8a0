//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::schedule_slots::{ActiveModel, Column, Entity as ScheduleSlots};
use crate::errors::{PortalError, Result};
use crate::models::schedules::{
    entities::ScheduleSlot,
    requests::{CreateScheduleRequest, UpdateScheduleRequest},
    responses::ScheduleEntry,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_schedule_slot_impl(&self, req: CreateScheduleRequest) -> Result<ScheduleSlot> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            academic_year: Set(req.academic_year),
            day_of_week: Set(req.day_of_week),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            room: Set(req.room),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建课表时段失败: {e}")))?;

        Ok(result.into_slot())
    }

    pub async fn get_schedule_slot_by_id_impl(&self, slot_id: i64) -> Result<Option<ScheduleSlot>> {
        let result = ScheduleSlots::find_by_id(slot_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课表时段失败: {e}")))?;

        Ok(result.map(|m| m.into_slot()))
    }

    pub async fn update_schedule_slot_impl(
        &self,
        slot_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleSlot>> {
        if self.get_schedule_slot_by_id_impl(slot_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(slot_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(day) = update.day_of_week {
            model.day_of_week = Set(day);
        }
        if let Some(start) = update.start_time {
            model.start_time = Set(start);
        }
        if let Some(end) = update.end_time {
            model.end_time = Set(end);
        }
        if let Some(room) = update.room {
            model.room = Set(room);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新课表时段失败: {e}")))?;

        Ok(Some(result.into_slot()))
    }

    pub async fn delete_schedule_slot_impl(&self, slot_id: i64) -> Result<bool> {
        let result = ScheduleSlots::delete_by_id(slot_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除课表时段失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按课程与学年列出时段，course_ids 为 None 时不限课程
    pub async fn list_schedule_slots_impl(
        &self,
        course_ids: Option<Vec<i64>>,
        academic_year: Option<String>,
    ) -> Result<Vec<ScheduleEntry>> {
        let mut select = ScheduleSlots::find();

        if let Some(ids) = course_ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            select = select.filter(Column::CourseId.is_in(ids));
        }
        if let Some(year) = academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }

        let rows = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .find_also_related(Courses)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(slot, course)| {
                course.map(|c| ScheduleEntry {
                    slot: slot.into_slot(),
                    course_code: c.code,
                    course_name: c.name,
                })
            })
            .collect())
    }

    pub async fn list_room_slots_impl(
        &self,
        room: &str,
        day_of_week: i32,
        academic_year: &str,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ScheduleSlot>> {
        let mut select = ScheduleSlots::find()
            .filter(Column::Room.eq(room))
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(Column::AcademicYear.eq(academic_year));

        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let rows = select
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询教室时段失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_slot()).collect())
    }
}
