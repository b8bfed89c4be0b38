use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use bing_image_creator::*;

pub const JOB_ID: &str = "1-6931be365bf040cabbae8cb6cf435a0a";

pub const DALLE3_HTML: &str = r#"<div class="gir_mmimg"><img class="image-row-img mimg" src="https://tse3.mm.bing.net/th/id/OIG4.HfM5lIwyCttDOzJbyOCW?w=270&amp;h=270&amp;c=6&amp;r=0&amp;o=5&amp;pid=ImgGn" alt="Image 1"/><img class="image-row-img mimg" src="https://tse4.mm.bing.net/th/id/OIG4.KlXYym2JqxlbBaa398Dm?w=270&amp;h=270&amp;c=6&amp;r=0&amp;o=5&amp;pid=ImgGn" alt="Image 2"/><img class="image-row-img mimg" src="https://tse3.mm.bing.net/th/id/OIG4.t3zhkpucTDOhAvlOwhpo?w=270&amp;h=270&amp;c=6&amp;r=0&amp;o=5&amp;pid=ImgGn" alt="Image 3"/><img class="image-row-img mimg" src="https://tse1.mm.bing.net/th/id/OIG4.3x_XtWuqP68T7JRwKQm9?w=270&amp;h=270&amp;c=6&amp;r=0&amp;o=5&amp;pid=ImgGn" alt="Image 4"/><script src="https://r.bing.com/rp/gen.br.js"></script></div>"#;

/// One scripted reaction to a request.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(BingResponse),
    Delay(Duration, BingResponse),
    /// Never completes; only a timeout gets the caller out.
    Hang,
}

/// Transport that replays a fixed script and records every request.
///
/// Once the script runs out, `fallback` is used for every further request.
#[derive(Debug)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    requests: Mutex<Vec<BingRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self::with_fallback(steps, Step::Respond(ok("")))
    }

    pub fn with_fallback(steps: Vec<Step>, fallback: Step) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<BingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: BingRequest) -> Result<BingResponse> {
        let step = {
            self.requests.lock().unwrap().push(request);
            self.steps.lock().unwrap().pop_front()
        };

        match step.unwrap_or_else(|| self.fallback.clone()) {
            Step::Respond(resp) => Ok(resp),
            Step::Delay(delay, resp) => {
                tokio::time::sleep(delay).await;
                Ok(resp)
            }
            Step::Hang => std::future::pending().await,
        }
    }
}

pub fn redirect(location: &str) -> BingResponse {
    BingResponse {
        status: 302,
        status_text: "Found".into(),
        location: Some(location.to_string()),
        body: String::new(),
    }
}

pub fn accepted() -> BingResponse {
    redirect(&format!(
        "/images/create?q=a+simple+red+circle&rt=4&mdl=0&ar=1&FORM=GENCRE&id={}",
        JOB_ID
    ))
}

pub fn ok(body: &str) -> BingResponse {
    BingResponse {
        status: 200,
        status_text: "OK".into(),
        location: None,
        body: body.to_string(),
    }
}

pub fn status(code: u16, text: &str) -> BingResponse {
    BingResponse {
        status: code,
        status_text: text.to_string(),
        location: None,
        body: String::new(),
    }
}

pub fn query(request: &BingRequest) -> HashMap<String, String> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
