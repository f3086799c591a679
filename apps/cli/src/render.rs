use shared::domain::{Comment, FormMode};

pub fn render_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "Comments List\n  (no comments)\n".to_string();
    }
    let mut out = String::from("Comments List\n");
    for comment in comments {
        out.push_str(&format!(
            "  #{} {} <{}>\n      {}\n",
            comment.id,
            comment.name,
            comment.email,
            comment.body.replace('\n', "\n      ")
        ));
    }
    out
}

pub fn render_form(form: &Comment) -> String {
    let mode = FormMode::of(form);
    let target = match mode {
        FormMode::Create => "new comment".to_string(),
        FormMode::Update(id) => format!("comment #{id}"),
    };
    format!(
        "Form ({target}) [{}]\n  name:  {}\n  email: {}\n  body:  {}\n",
        mode.action_label(),
        form.name,
        form.email,
        form.body
    )
}
