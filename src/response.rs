//! JSON envelopes: `{"data": ...}` for one record, `{"data": [...], "meta": {...}}` for lists.

use crate::store::ListQuery;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// `count` is the number of items in this response. Paging is echoed back when requested.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct ListMeta {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

pub type One<T> = (StatusCode, Json<SuccessOne<T>>);
pub type Many<T> = (StatusCode, Json<SuccessMany<T>>);

/// 201 with the created record.
pub fn success_one<T: Serialize>(data: T) -> One<T> {
    (StatusCode::CREATED, Json(SuccessOne { data }))
}

pub fn success_one_ok<T: Serialize>(data: T) -> One<T> {
    (StatusCode::OK, Json(SuccessOne { data }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> Many<T> {
    success_page(data, &ListQuery::all())
}

pub fn success_page<T: Serialize>(data: Vec<T>, query: &ListQuery) -> Many<T> {
    let meta = ListMeta {
        count: data.len() as u64,
        limit: query.limit,
        offset: query.offset,
    };
    (StatusCode::OK, Json(SuccessMany { data, meta }))
}
