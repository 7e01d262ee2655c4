// The markup is spliced into markdown, where a blank line would end the raw
// HTML block. Keep these free of blank lines.

pub const STYLE: &str = r#"<style>
:root{--kb-border:rgba(0,0,0,.12);--kb-col-bg:rgba(0,0,0,.03);--kb-col-title-bg:rgba(255,255,255,.7);--kb-list-bg:rgba(0,0,0,.05);--kb-card-bg:rgba(255,255,255,.92);--kb-shadow:rgba(0,0,0,.12);--kb-input-bg:rgba(255,255,255,.8)}
[data-md-color-scheme="slate"]{--kb-border:rgba(255,255,255,.12);--kb-col-bg:rgba(255,255,255,.04);--kb-col-title-bg:rgba(0,0,0,.18);--kb-list-bg:rgba(0,0,0,.22);--kb-card-bg:rgba(255,255,255,.06);--kb-shadow:rgba(0,0,0,.35);--kb-input-bg:rgba(255,255,255,.06)}
.kb-wrap{margin:.6rem 0 1.1rem}
.kb-toolbar{display:flex;flex-wrap:wrap;gap:10px;margin-bottom:.6rem;align-items:center}
.kb-field,.kb-check{display:flex;align-items:center;gap:8px;border:1px solid var(--kb-border);background:var(--kb-input-bg);border-radius:14px;padding:.4rem .6rem}
.kb-field label{font-size:.84rem;opacity:.85;white-space:nowrap}
.kb-input,.kb-select{border:0;outline:none;background:transparent;color:inherit;font-size:.92rem;min-width:150px}
.kb-check{cursor:pointer;user-select:none}
.kb-hidden{display:none !important}
.kb-tagbar{display:flex;flex-wrap:wrap;gap:8px;margin-bottom:.65rem}
.kb-tagfilter{border-radius:999px;border:1px solid var(--kb-border);padding:.18rem .55rem;font-size:.84rem;background:transparent;color:inherit;cursor:pointer;opacity:.7}
.kb-tagfilter:hover{opacity:.95;box-shadow:0 6px 16px var(--kb-shadow)}
.kb-tagfilter.is-active{opacity:1;background:var(--tg-bg);color:var(--tg-fg);border-color:var(--tg-fg)}
.kb-board{display:flex;gap:12px;align-items:stretch;overflow-x:auto;padding-bottom:7px;scroll-snap-type:x proximity}
.kb-col{flex:0 0 calc((100% - 48px) / 5);min-width:210px;background:var(--kb-col-bg);border:1px solid var(--kb-border);border-radius:16px;overflow:hidden;display:flex;flex-direction:column;scroll-snap-align:start}
@media (max-width:1200px){.kb-col{flex-basis:280px}}
.kb-col-title{padding:.6rem .75rem;font-weight:750;background:var(--kb-col-title-bg);border-bottom:1px solid var(--kb-border)}
.kb-cards{padding:.65rem;background:var(--kb-list-bg);flex:1;display:flex;flex-direction:column;gap:11px}
.kb-empty{opacity:.6;text-align:center;padding:.9rem 0}
.kb-card{background:var(--kb-card-bg);border:1px solid var(--kb-border);border-radius:14px;padding:.62rem .72rem;display:block;text-decoration:none;color:inherit}
a.kb-card:hover{box-shadow:0 8px 20px var(--kb-shadow)}
.kb-done{opacity:.65}
.kb-card-title{font-weight:700;margin-bottom:.4rem;line-height:1.22}
.kb-meta{display:flex;flex-wrap:wrap;gap:6px}
.kb-chip{font-size:.79rem;padding:.1rem .48rem;border-radius:999px;border:1px solid var(--kb-border)}
.kb-date.past{border-color:rgba(220,60,60,.7)}
.kb-date.soon{border-color:rgba(255,170,0,.7)}
.kb-date.later{border-color:rgba(80,160,255,.7)}
.kb-col.kb-archived{display:none}
.kb-wrap.kb-show-archived .kb-col.kb-archived{display:flex}
.kb-wrap.kb-only-archived .kb-col:not(.kb-archived){display:none !important}
</style>"#;

pub const SCRIPT: &str = r#"<script>
(function(){
  const wrap = document.currentScript.closest('[data-kb-wrap]');
  if(!wrap) return;
  const field = name => wrap.querySelector('[data-kb-filter="' + name + '"]');
  const toggle = name => wrap.querySelector('[data-kb-toggle="' + name + '"]');
  const q = field('q'), status = field('status'), from = field('from'), to = field('to');
  const archived = toggle('archived'), onlyArchived = toggle('onlyarchived'), done = toggle('done');
  const cols = Array.from(wrap.querySelectorAll('.kb-col'));
  const activeTags = new Set();
  const list = (el, name) => (el.getAttribute(name) || '').split(',').filter(Boolean);
  function day(s){
    const m = /^(\d{4})-(\d{2})-(\d{2})$/.exec(s || '');
    return m ? new Date(+m[1], +m[2] - 1, +m[3]).getTime() : null;
  }
  function modes(){
    const only = !!(onlyArchived && onlyArchived.checked);
    wrap.classList.toggle('kb-only-archived', only);
    wrap.classList.toggle('kb-show-archived', only || !!(archived && archived.checked));
    if(archived){
      if(only) archived.checked = true;
      archived.disabled = only;
    }
  }
  function apply(){
    const needle = (q && q.value || '').trim().toLowerCase();
    const st = status ? status.value : '';
    const lo = from ? day(from.value) : null, hi = to ? day(to.value) : null;
    const showDone = !done || done.checked;
    cols.forEach(col => {
      let visible = 0;
      col.querySelectorAll('.kb-card').forEach(card => {
        const title = (card.getAttribute('data-title') || '').toLowerCase();
        const hasDates = card.getAttribute('data-hasdates') === '1';
        let ok = !needle || title.includes(needle);
        if(ok && activeTags.size) ok = list(card, 'data-tags').some(t => activeTags.has(t));
        if(ok && st === 'nodate') ok = !hasDates;
        else if(ok && (lo !== null || hi !== null)) ok = hasDates && list(card, 'data-dates').some(d => {
          const t = day(d);
          return t !== null && (lo === null || t >= lo) && (hi === null || t <= hi);
        });
        else if(ok && st) ok = list(card, 'data-statuses').includes(st);
        if(ok && !showDone && card.classList.contains('kb-done')) ok = false;
        card.classList.toggle('kb-hidden', !ok);
        if(ok) visible++;
      });
      const empty = col.querySelector('[data-kb-empty="filtered"]');
      if(empty) empty.style.display = visible ? 'none' : 'block';
    });
  }
  wrap.querySelectorAll('[data-kb-tag]').forEach(btn => btn.addEventListener('click', () => {
    const tag = btn.getAttribute('data-kb-tag');
    if(activeTags.has(tag)) activeTags.delete(tag); else activeTags.add(tag);
    btn.classList.toggle('is-active', activeTags.has(tag));
    apply();
  }));
  [q].forEach(el => el && el.addEventListener('input', apply));
  [status, from, to, done].forEach(el => el && el.addEventListener('change', apply));
  [archived, onlyArchived].forEach(el => el && el.addEventListener('change', () => { modes(); apply(); }));
  modes();
  apply();
})();
</script>"#;
