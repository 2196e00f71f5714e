//! API Handler for the lucky draw
//!
//! Dispatches parsed requests to the shared draw service. The service lock
//! serializes every request, so each one observes the effects of all
//! earlier ones.

use serde_json::{json, Value};

use crate::controller::DrawService;
use crate::export::{self, ExportFormat};

use super::errors::ApiResult;
use super::request::{ExportRequest, Request};
use super::response::Response;

/// API Handler over a shared draw service
pub struct ApiHandler<'a> {
    service: &'a DrawService,
}

impl<'a> ApiHandler<'a> {
    /// Create a new API handler
    pub fn new(service: &'a DrawService) -> Self {
        Self { service }
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        Response::from_result(Request::parse(json_request).and_then(|r| self.dispatch(r)))
    }

    fn dispatch(&self, request: Request) -> ApiResult<Value> {
        let service = self.service;
        let data = match request {
            Request::LoadCandidates(text) => {
                json!(service.write(|d| d.load_candidates(&text))?)
            }
            Request::LoadCsv(csv) => json!(service.write(|d| d.load_candidates_csv(&csv))?),
            Request::ResetPool => json!(service.write(|d| Ok(d.reset_pool()))?),
            Request::ClearPool => {
                service.write(|d| {
                    d.clear_pool();
                    Ok(())
                })?;
                Value::Null
            }
            Request::PoolStatus => json!(service.read(|d| d.pool_status())?),
            Request::Draw(req) => {
                json!(service.write(|d| d.draw(req.count, &req.prize_label))?)
            }
            Request::DrawPrize(id) => json!(service.write(|d| d.draw_prize(id))?),
            Request::MarkForfeited(req) => {
                let draw_id =
                    service.write(|d| d.mark_forfeited(&req.winner_ids, &req.reason))?;
                json!({ "draw_id": draw_id, "forfeited": req.winner_ids.len() })
            }
            Request::Redraw(ids) => json!(service.write(|d| d.redraw(&ids))?),
            Request::RedrawPending(id) => json!(service.write(|d| d.redraw_pending(id))?),
            Request::ConsolidatedWinners(id) => {
                let (winners, summary) = service.read(|d| {
                    Ok::<_, crate::draw::DrawError>((
                        d.consolidated_winners(id)?,
                        d.consolidated_summary(id)?,
                    ))
                })??;
                json!({ "winners": winners, "summary": summary })
            }
            Request::History => json!(service.read(|d| d.sessions().to_vec())?),
            Request::UndoLastDraw => json!(service.write(|d| d.undo_last_draw())?),
            Request::UndoLastRedraw(id) => json!(service.write(|d| d.undo_last_redraw(id))?),
            Request::ClearHistory => {
                service.write(|d| {
                    d.clear_history();
                    Ok(())
                })?;
                Value::Null
            }
            Request::AddPrize(req) => json!(service.write(|d| d.add_prize(
                &req.name,
                req.winner_count,
                req.description.as_deref()
            ))?),
            Request::UpdatePrize(id, update) => {
                json!(service.write(|d| d.update_prize(id, update))?)
            }
            Request::RemovePrize(id) => json!(service.write(|d| d.remove_prize(id))?),
            Request::ListPrizes => json!(service.read(|d| d.prizes().prizes().to_vec())?),
            Request::Export(req) => json!({ "content": self.export(req)? }),
            Request::Metrics => json!(service.metrics().snapshot()),
        };
        Ok(data)
    }

    fn export(&self, req: ExportRequest) -> ApiResult<String> {
        let content = self.service.read(|d| match req.draw_id {
            Some(id) => d
                .require_session(id)
                .map(|s| export::export_session(s, req.format)),
            None => Ok(match req.format {
                ExportFormat::Csv => export::history_to_csv(d.sessions()),
                ExportFormat::Text => d
                    .sessions()
                    .iter()
                    .map(export::winners_to_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
            }),
        })??;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::LuckyDraw;
    use crate::pool::RngSampler;

    fn service() -> DrawService {
        DrawService::new(LuckyDraw::with_sampler(Box::new(RngSampler::seeded(99))))
    }

    fn data(resp: Response) -> Value {
        match resp {
            Response::Success(s) => s.data,
            Response::Error(e) => panic!("unexpected error: {} {}", e.code, e.message),
        }
    }

    fn error_code(resp: Response) -> String {
        match resp {
            Response::Error(e) => e.code,
            Response::Success(s) => panic!("unexpected success: {}", s.data),
        }
    }

    #[test]
    fn test_load_and_draw() {
        let service = service();
        let handler = ApiHandler::new(&service);

        let status = data(handler.handle(r#"{"op":"load_candidates","text":"A,B,C,D"}"#));
        assert_eq!(status["total"], 4);

        let session = data(handler.handle(r#"{"op":"draw","count":3,"prize_label":"Grand"}"#));
        assert_eq!(session["winners"].as_array().unwrap().len(), 3);
        assert_eq!(session["prize_label"], "Grand");

        let status = data(handler.handle(r#"{"op":"pool_status"}"#));
        assert_eq!(status["available"], 1);
    }

    #[test]
    fn test_insufficient_candidates_code() {
        let service = service();
        let handler = ApiHandler::new(&service);
        handler.handle(r#"{"op":"load_candidates","text":"A\nB\nC"}"#);

        let code = error_code(handler.handle(r#"{"op":"draw","count":4}"#));
        assert_eq!(code, "LUCKY_INSUFFICIENT_CANDIDATES");
    }

    #[test]
    fn test_forfeit_redraw_and_consolidate() {
        let service = service();
        let handler = ApiHandler::new(&service);
        handler.handle(r#"{"op":"load_candidates","text":"A\nB\nC\nD\nE"}"#);
        let session = data(handler.handle(r#"{"op":"draw","count":2}"#));
        let draw_id = session["id"].as_str().unwrap().to_string();
        let target = session["winners"][0]["id"].as_str().unwrap().to_string();

        let forfeit = format!(
            r#"{{"op":"mark_forfeited","winner_ids":["{}"],"reason":"absent"}}"#,
            target
        );
        data(handler.handle(&forfeit));

        let redraw = format!(r#"{{"op":"redraw","winner_ids":["{}"]}}"#, target);
        let replacements = data(handler.handle(&redraw));
        assert_eq!(replacements.as_array().unwrap().len(), 1);

        let view = format!(r#"{{"op":"consolidated_winners","draw_id":"{}"}}"#, draw_id);
        let view = data(handler.handle(&view));
        assert_eq!(view["winners"].as_array().unwrap().len(), 2);
        assert_eq!(view["summary"]["replacements"], 1);
    }

    #[test]
    fn test_export_history_csv() {
        let service = service();
        let handler = ApiHandler::new(&service);
        handler.handle(r#"{"op":"load_candidates","text":"A\nB"}"#);
        handler.handle(r#"{"op":"draw","count":1,"prize_label":"Mug"}"#);

        let export = data(handler.handle(r#"{"op":"export"}"#));
        let content = export["content"].as_str().unwrap();
        assert!(content.starts_with("Draw #,Prize,Winners,Timestamp,Count"));
        assert!(content.contains("Mug"));
    }

    #[test]
    fn test_unknown_draw_id() {
        let service = service();
        let handler = ApiHandler::new(&service);
        let req = format!(
            r#"{{"op":"redraw_pending","draw_id":"{}"}}"#,
            crate::draw::SessionId::new()
        );
        assert_eq!(error_code(handler.handle(&req)), "LUCKY_NOT_FOUND");
    }
}
