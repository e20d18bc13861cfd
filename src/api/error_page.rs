//! 通用错误页
//!
//! 认证失败与控制器错误以外的所有错误都渲染为此页面。
//! [`attach_detail`] 作为集中错误处理器，在 development 环境下重新渲染并附带错误详情。

use actix_web::{
    HttpResponse,
    dev::ServiceResponse,
    http::{StatusCode, header::ContentType},
    middleware::ErrorHandlerResponse,
    web,
};

use crate::config::AppConfig;
use crate::errors::AppError;

/// 渲染错误页
pub fn render(status: StatusCode, message: &str, detail: Option<&str>) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::html())
        .body(page_html(status, message, detail))
}

/// 错误响应处理器：development 环境下为错误页补充详情
pub fn attach_detail<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let show_detail = res
        .request()
        .app_data::<web::Data<AppConfig>>()
        .is_some_and(|config| config.server.is_development());

    let page = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .filter(|err| err.renders_page())
        .map(|err| (err.to_string(), format!("{:?}", err)));

    match page {
        Some((message, detail)) if show_detail => {
            let status = res.status();
            let (req, _) = res.into_parts();
            let resp = render(status, &message, Some(&detail));
            Ok(ErrorHandlerResponse::Response(
                ServiceResponse::new(req, resp).map_into_right_body(),
            ))
        }
        _ => Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    }
}

fn page_html(status: StatusCode, message: &str, detail: Option<&str>) -> String {
    let detail = detail
        .map(|d| format!("<pre>{}</pre>", escape_html(d)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html><head><title>{code}</title></head>\
         <body><h1>{message}</h1><h2>{code}</h2>{detail}</body></html>",
        code = status.as_u16(),
        message = escape_html(message),
        detail = detail,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
