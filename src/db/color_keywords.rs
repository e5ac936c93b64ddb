use sqlx::SqlitePool;

use crate::models::{ColorKeyword, NewColorKeywordRequest, UpdateColorKeywordRequest};

/// All keywords, highest priority first. The color resolver relies on this
/// order.
pub async fn fetch_color_keywords(db: &SqlitePool) -> Result<Vec<ColorKeyword>, sqlx::Error> {
    sqlx::query_as::<_, ColorKeyword>(
        "SELECT id, keyword, color, priority FROM color_keywords ORDER BY priority DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_color_keyword(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<ColorKeyword>, sqlx::Error> {
    sqlx::query_as::<_, ColorKeyword>(
        "SELECT id, keyword, color, priority FROM color_keywords WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_color_keyword(
    db: &SqlitePool,
    req: &NewColorKeywordRequest,
) -> Result<ColorKeyword, sqlx::Error> {
    let keyword = req.keyword.trim().to_string();
    let priority = req.priority.unwrap_or(0);

    let result = sqlx::query("INSERT INTO color_keywords (keyword, color, priority) VALUES (?, ?, ?)")
        .bind(&keyword)
        .bind(&req.color)
        .bind(priority)
        .execute(db)
        .await?;

    Ok(ColorKeyword {
        id: result.last_insert_rowid(),
        keyword,
        color: req.color.clone(),
        priority,
    })
}

pub async fn update_color_keyword(
    db: &SqlitePool,
    id: i64,
    req: &UpdateColorKeywordRequest,
) -> Result<Option<ColorKeyword>, sqlx::Error> {
    let Some(mut current) = find_color_keyword(db, id).await? else {
        return Ok(None);
    };

    if let Some(keyword) = &req.keyword {
        current.keyword = keyword.trim().to_string();
    }
    if let Some(color) = &req.color {
        current.color = color.clone();
    }
    if let Some(priority) = req.priority {
        current.priority = priority;
    }

    sqlx::query("UPDATE color_keywords SET keyword = ?, color = ?, priority = ? WHERE id = ?")
        .bind(&current.keyword)
        .bind(&current.color)
        .bind(current.priority)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_color_keyword(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM color_keywords WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
