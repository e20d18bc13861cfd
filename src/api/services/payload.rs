use actix_web::{Either, web};

/// 请求体：同时接受 JSON 与 urlencoded 表单
pub type Payload<T> = Either<web::Json<T>, web::Form<T>>;

pub fn into_inner<T>(payload: Payload<T>) -> T {
    match payload {
        Either::Left(web::Json(body)) => body,
        Either::Right(web::Form(body)) => body,
    }
}
